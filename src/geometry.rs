/// A position in play-field units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Same size, moved so the top-left corner sits at `p`
    pub fn at(&self, p: Point) -> Self {
        Self { x: p.x, y: p.y, ..*self }
    }

    /// Area shared with `other`; zero when they only touch or are apart
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Strict intersection: touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.overlap_area(other) > 0.0
    }
}

/// Logical play area the words move across.
///
/// Words are measured in glyph cells: a word is `width(text) * glyph_width`
/// wide and `line_height` tall. The terminal front-end scales the field onto
/// whatever area it is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayField {
    pub width: f64,
    pub height: f64,
    pub glyph_width: f64,
    pub line_height: f64,
}

/// Topmost row a word may spawn on
pub const SPAWN_TOP: f64 = 20.0;
/// Space kept free under the lowest spawn row for the status bar
pub const SPAWN_BOTTOM_MARGIN: f64 = 70.0;

impl PlayField {
    /// Inclusive integer range of spawn rows, collapsed to the top row when
    /// the field is too short to hold any
    pub fn spawn_rows(&self) -> (i64, i64) {
        let top = SPAWN_TOP as i64;
        let bottom = (self.height - SPAWN_BOTTOM_MARGIN).floor() as i64;
        (top, bottom.max(top))
    }
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            glyph_width: 12.0,
            line_height: 30.0,
        }
    }
}
