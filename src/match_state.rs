use crate::leaderboard::MatchRecord;

/// Misses that end a match
pub const MISS_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum MatchStatus {
    #[strum(serialize = "Playing")]
    Ongoing,
    #[strum(serialize = "Game Over")]
    Lost,
    #[strum(serialize = "You win!")]
    Won,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchStatus::Ongoing)
    }
}

/// Counters and scoring for one match
#[derive(Debug, Clone)]
pub struct MatchState {
    pub score: u64,
    pub words_finished: usize,
    pub missed_count: u32,
    pub elapsed_secs: f64,
    total_words: usize,
    speed_setting: u32,
    max_freq_setting: u32,
    recorded: bool,
}

impl MatchState {
    /// Settings are the integer option values: speed in hundredths, the
    /// frequency floor in tenths of a second
    pub fn new(total_words: usize, speed_setting: u32, max_freq_setting: u32) -> Self {
        Self {
            score: 0,
            words_finished: 0,
            missed_count: 0,
            elapsed_secs: 0.0,
            total_words,
            speed_setting,
            max_freq_setting,
            recorded: false,
        }
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn advance_clock(&mut self, delta_secs: f64) {
        self.elapsed_secs += delta_secs.max(0.0);
    }

    /// Words per minute over the whole match so far, truncated
    pub fn wpm(&self) -> u32 {
        if self.elapsed_secs <= 0.0 {
            return 0;
        }
        (self.words_finished as f64 / self.elapsed_secs * 60.0) as u32
    }

    /// Score is recomputed from the current pace, not accumulated.
    /// `wpm * speed * max_frequency * 20` in whole numbers:
    /// `(speed_setting / 100) * (max_freq_setting / 10) * 20 = s * f / 50`.
    pub fn on_word_completed(&mut self) {
        self.words_finished += 1;
        let per_word = u64::from(self.wpm())
            * u64::from(self.speed_setting)
            * u64::from(self.max_freq_setting)
            / 50;
        self.score = self.words_finished as u64 * per_word;
    }

    pub fn on_word_expired(&mut self) {
        if self.missed_count < MISS_LIMIT {
            self.missed_count += 1;
        }
    }

    pub fn status(&self) -> MatchStatus {
        if self.missed_count >= MISS_LIMIT {
            MatchStatus::Lost
        } else if self.words_finished >= self.total_words {
            MatchStatus::Won
        } else {
            MatchStatus::Ongoing
        }
    }

    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    /// Summary of a finished match. Only the first call after the match
    /// ends returns a record.
    pub fn take_record(&mut self, nickname: &str, date: &str) -> Option<MatchRecord> {
        if self.recorded || !self.status().is_terminal() {
            return None;
        }
        self.recorded = true;

        Some(MatchRecord {
            nickname: nickname.to_string(),
            score: self.score,
            wpm: self.wpm(),
            speed_setting: self.speed_setting,
            max_freq_setting: self.max_freq_setting,
            elapsed_secs: self.elapsed_secs as f32,
            date: date.to_string(),
        })
    }
}
