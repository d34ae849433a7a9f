use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

use crate::leaderboard::MatchRecord;

pub const HEADERS: [&str; 7] = ["Nickname", "Score", "WPM", "Speed", "Freq.", "Time", "Date"];

pub fn row_cells(record: &MatchRecord) -> [String; 7] {
    [
        record.nickname.clone(),
        record.score.to_string(),
        record.wpm.to_string(),
        record.speed_setting.to_string(),
        record.max_freq_setting.to_string(),
        format!("{:.2}s", record.elapsed_secs),
        record.date.clone(),
    ]
}

/// Plain-text table with a header row and columns padded to their widest cell
pub fn format_table(records: &[MatchRecord]) -> Vec<String> {
    let rows: Vec<[String; 7]> = std::iter::once(HEADERS.map(str::to_string))
        .chain(records.iter().map(row_cells))
        .collect();

    let widths: Vec<usize> = (0..HEADERS.len())
        .map(|col| rows.iter().map(|r| r[col].width()).max().unwrap_or(0))
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell}{}", " ".repeat(w - cell.width())))
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}
