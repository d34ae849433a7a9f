use ratatui::{layout::Rect as Area, style::Color};

use crate::geometry::{PlayField, Rect};

/// Terminal cell a word's top-left corner lands on. The column may be
/// negative while a word is still entering from the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub col: i64,
    pub row: u16,
}

/// Scale play-field units onto the terminal area
pub fn project(bounds: &Rect, field: &PlayField, area: Area) -> Cell {
    let col = (bounds.x / field.width * f64::from(area.width)).floor() as i64;
    let row = (bounds.y / field.height * f64::from(area.height)).floor();
    let max_row = area.height.saturating_sub(1);
    Cell {
        col,
        row: (row.max(0.0) as u16).min(max_row),
    }
}

/// Characters of `text` that fall inside `width` columns when drawn
/// starting at `col`, with the column of the first visible one
pub fn visible_slice(text: &str, col: i64, width: u16) -> Option<(u16, String)> {
    let skip = usize::try_from(-col).unwrap_or(0);
    let start = col.max(0);
    if start >= i64::from(width) {
        return None;
    }
    let room = (i64::from(width) - start) as usize;
    let shown: String = text.chars().skip(skip).take(room).collect();
    if shown.is_empty() {
        None
    } else {
        Some((start as u16, shown))
    }
}

/// White while far, yellow past the middle, red near the exit
pub fn urgency_color(x: f64, field: &PlayField) -> Color {
    let width = field.width;
    if x >= width / 1.2 {
        Color::Red
    } else if x >= width / 1.8 {
        Color::Yellow
    } else {
        Color::White
    }
}
