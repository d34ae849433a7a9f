use crate::app_dirs::AppDirs;
use chrono::NaiveDate;
use itertools::Itertools;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// How many entries the scoreboard shows
pub const TOP_SCORES: usize = 10;
/// `DD.MM.YYYY`
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Summary of one finished match, as stored in the score log
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub nickname: String,
    pub score: u64,
    pub wpm: u32,
    pub speed_setting: u32,
    pub max_freq_setting: u32,
    pub elapsed_secs: f32,
    pub date: String,
}

/// Writes the log line without its trailing newline
impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.nickname,
            self.score,
            self.wpm,
            self.speed_setting,
            self.max_freq_setting,
            self.elapsed_secs,
            self.date
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseRecordError {
    #[error("expected 7 fields, found {0}")]
    FieldCount(usize),
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseRecordError> {
    value.parse().map_err(|_| ParseRecordError::InvalidField {
        field,
        value: value.to_string(),
    })
}

impl FromStr for MatchRecord {
    type Err = ParseRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[nickname, score, wpm, speed, max_freq, elapsed, date] = fields.as_slice() else {
            return Err(ParseRecordError::FieldCount(fields.len()));
        };

        let elapsed_secs: f32 = parse_field("elapsed time", elapsed)?;
        if !elapsed_secs.is_finite() {
            return Err(ParseRecordError::InvalidField {
                field: "elapsed time",
                value: elapsed.to_string(),
            });
        }
        if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            return Err(ParseRecordError::InvalidField {
                field: "date",
                value: date.to_string(),
            });
        }

        Ok(MatchRecord {
            nickname: nickname.to_string(),
            score: parse_field("score", score)?,
            wpm: parse_field("wpm", wpm)?,
            speed_setting: parse_field("speed", speed)?,
            max_freq_setting: parse_field("max frequency", max_freq)?,
            elapsed_secs,
            date: date.to_string(),
        })
    }
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("score log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Append-only record of finished matches
pub trait ScoreStore {
    fn append(&self, record: &MatchRecord) -> Result<(), LeaderboardError>;
    fn top_n(&self, n: usize) -> Result<Vec<MatchRecord>, LeaderboardError>;
}

/// Score log kept as one whitespace-separated line per match
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::scores_path().unwrap_or_else(|| PathBuf::from("scores.txt"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> LeaderboardError {
        LeaderboardError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for FileScoreStore {
    fn append(&self, record: &MatchRecord) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        writeln!(log_file, "{record}").map_err(|e| self.io_error(e))?;
        log_file.flush().map_err(|e| self.io_error(e))?;
        log_file.sync_data().map_err(|e| self.io_error(e))?;

        log::info!("recorded score {} for {}", record.score, record.nickname);
        Ok(())
    }

    fn top_n(&self, n: usize) -> Result<Vec<MatchRecord>, LeaderboardError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    log::debug!("skipping score line {}: not utf-8", line_no + 1);
                    continue;
                }
                Err(e) => return Err(self.io_error(e)),
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<MatchRecord>() {
                Ok(record) => records.push(record),
                Err(e) => log::debug!("skipping score line {}: {e}", line_no + 1),
            }
        }

        Ok(select_top(records, n))
    }
}

/// Heap entry ordered by score; among equal scores the later line is smaller
/// so the earlier one survives eviction and sorts first
struct Ranked {
    seq: usize,
    record: MatchRecord,
}

impl Ranked {
    fn key(&self) -> (u64, Reverse<usize>) {
        (self.record.score, Reverse(self.seq))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Keep the `n` highest scores using a min-heap bounded at `n`, then order
/// them highest first
pub fn select_top<I>(records: I, n: usize) -> Vec<MatchRecord>
where
    I: IntoIterator<Item = MatchRecord>,
{
    if n == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::new();
    for (seq, record) in records.into_iter().enumerate() {
        if heap.len() < n {
            heap.push(Reverse(Ranked { seq, record }));
        } else if heap
            .peek()
            .is_some_and(|Reverse(min)| record.score > min.record.score)
        {
            heap.pop();
            heap.push(Reverse(Ranked { seq, record }));
        }
    }

    heap.into_iter()
        .map(|Reverse(ranked)| ranked)
        .sorted_by(|a, b| b.cmp(a))
        .map(|ranked| ranked.record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn record(nickname: &str, score: u64) -> MatchRecord {
        MatchRecord {
            nickname: nickname.to_string(),
            score,
            wpm: 42,
            speed_setting: 3,
            max_freq_setting: 7,
            elapsed_secs: 12.5,
            date: "14.10.2026".to_string(),
        }
    }

    #[test]
    fn test_display_matches_log_format() {
        let mut r = record("stan", 1260);
        r.elapsed_secs = 31.337;
        assert_eq!(r.to_string(), "stan 1260 42 3 7 31.337 14.10.2026");
    }

    #[test]
    fn test_parse_log_line() {
        let r: MatchRecord = "Guest1234 840 30 4 6 58.21 01.02.2024".parse().unwrap();
        assert_eq!(r.nickname, "Guest1234");
        assert_eq!(r.score, 840);
        assert_eq!(r.wpm, 30);
        assert_eq!(r.speed_setting, 4);
        assert_eq!(r.max_freq_setting, 6);
        assert_eq!(r.elapsed_secs, 58.21);
        assert_eq!(r.date, "01.02.2024");
    }

    #[test]
    fn test_parse_written_line_gives_back_record() {
        let r = record("stan", 99);
        assert_eq!(r.to_string().parse::<MatchRecord>(), Ok(r));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert_matches!(
            "stan 10 20".parse::<MatchRecord>(),
            Err(ParseRecordError::FieldCount(3))
        );
        assert_matches!(
            "stan ten 20 3 7 1.0 01.01.2024".parse::<MatchRecord>(),
            Err(ParseRecordError::InvalidField { field: "score", .. })
        );
        assert_matches!(
            "stan 10 20 3 7 1.0 2024-01-01".parse::<MatchRecord>(),
            Err(ParseRecordError::InvalidField { field: "date", .. })
        );
        assert_matches!(
            "stan 10 20 3 7 NaN 01.01.2024".parse::<MatchRecord>(),
            Err(ParseRecordError::InvalidField { field: "elapsed time", .. })
        );
        assert_matches!(
            "stan 10 20 3 7 1.0 01.01.2024 extra".parse::<MatchRecord>(),
            Err(ParseRecordError::FieldCount(8))
        );
    }

    #[test]
    fn test_select_top_keeps_highest_descending() {
        let scores = [5, 100, 3, 99, 42, 7, 64, 18, 77, 12, 50];
        let records = scores.iter().map(|&s| record("p", s));
        let top = select_top(records, 10);

        let got: Vec<u64> = top.iter().map(|r| r.score).collect();
        assert_eq!(got, vec![100, 99, 77, 64, 50, 42, 18, 12, 7, 5]);
    }

    #[test]
    fn test_select_top_with_fewer_records_than_n() {
        let top = select_top(vec![record("a", 1), record("b", 3)], 10);
        let got: Vec<u64> = top.iter().map(|r| r.score).collect();
        assert_eq!(got, vec![3, 1]);
    }

    #[test]
    fn test_select_top_zero() {
        assert!(select_top(vec![record("a", 1)], 0).is_empty());
    }

    #[test]
    fn test_select_top_ties_keep_log_order() {
        let records = vec![record("first", 10), record("second", 10), record("third", 10)];
        let top = select_top(records, 2);
        let names: Vec<&str> = top.iter().map(|r| r.nickname.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_append_writes_one_line_per_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.txt");
        let store = FileScoreStore::with_path(&path);

        store.append(&record("a", 1)).unwrap();
        store.append(&record("b", 2)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "a 1 42 3 7 12.5 14.10.2026\nb 2 42 3 7 12.5 14.10.2026\n"
        );
    }

    #[test]
    fn test_append_never_rewrites_existing_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, "old 5 1 1 5 2 01.01.2020\n").unwrap();

        let store = FileScoreStore::with_path(&path);
        store.append(&record("new", 6)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("old 5 1 1 5 2 01.01.2020\n"));
        assert!(contents.ends_with("new 6 42 3 7 12.5 14.10.2026\n"));
    }

    #[test]
    fn test_top_n_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileScoreStore::with_path(dir.path().join("none.txt"));
        assert!(store.top_n(TOP_SCORES).unwrap().is_empty());
    }

    #[test]
    fn test_top_n_skips_malformed_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(
            &path,
            "good 50 10 3 7 20.5 01.01.2024\n\
             broken line\n\
             \n\
             bad x 10 3 7 20.5 01.01.2024\n\
             better 70 12 3 7 19 02.01.2024\n",
        )
        .unwrap();

        let store = FileScoreStore::with_path(&path);
        let top = store.top_n(TOP_SCORES).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.nickname.as_str()).collect();
        assert_eq!(names, vec!["better", "good"]);
    }

    #[test]
    fn test_top_n_skips_invalid_utf8_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let mut bytes = b"good 50 10 3 7 20.5 01.01.2024\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe 999 10 3 7 20.5 01.01.2024\n");
        bytes.extend_from_slice(b"better 70 12 3 7 19 02.01.2024\n");
        fs::write(&path, bytes).unwrap();

        let top = FileScoreStore::with_path(&path).top_n(TOP_SCORES).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.nickname.as_str()).collect();
        assert_eq!(names, vec!["better", "good"]);
    }

    #[test]
    fn test_top_n_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileScoreStore::with_path(dir.path().join("scores.txt"));
        for s in [3, 1, 4, 1, 5, 9, 2, 6] {
            store.append(&record("p", s)).unwrap();
        }
        let first = store.top_n(5).unwrap();
        let second = store.top_n(5).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_append_to_unwritable_path_errors() {
        let dir = tempdir().unwrap();
        // a directory where the file should be
        let store = FileScoreStore::with_path(dir.path());
        assert_matches!(store.append(&record("a", 1)), Err(LeaderboardError::Io { .. }));
    }
}
