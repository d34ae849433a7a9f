use crate::config::GameSettings;
use crate::geometry::PlayField;
use crate::leaderboard::{MatchRecord, ScoreStore, DATE_FORMAT};
use crate::match_state::{MatchState, MatchStatus};
use crate::spawn::SpawnScheduler;
use crate::vocabulary::Vocabulary;
use crate::word_pool::WordPool;
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One player's game: the only owner of word, spawn and score state
#[derive(Debug)]
pub struct GameSession {
    pub settings: GameSettings,
    pub field: PlayField,
    pool: WordPool,
    scheduler: SpawnScheduler,
    match_state: MatchState,
    rng: StdRng,
    save_warning: Option<String>,
}

impl GameSession {
    pub fn new(vocabulary: &Vocabulary, settings: GameSettings, field: PlayField) -> Self {
        Self::with_rng(vocabulary, settings, field, StdRng::from_entropy())
    }

    /// Deterministic shuffle and placement
    pub fn with_seed(
        vocabulary: &Vocabulary,
        settings: GameSettings,
        field: PlayField,
        seed: u64,
    ) -> Self {
        Self::with_rng(vocabulary, settings, field, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        vocabulary: &Vocabulary,
        settings: GameSettings,
        field: PlayField,
        mut rng: StdRng,
    ) -> Self {
        let pool = WordPool::new(&vocabulary.words, &field, &mut rng);
        let scheduler = SpawnScheduler::new(pool.len(), settings.max_frequency);
        let match_state = MatchState::new(
            pool.len(),
            settings.speed_setting,
            settings.max_freq_setting,
        );
        log::info!(
            "starting match for {} with {} words from {}",
            settings.nickname,
            pool.len(),
            vocabulary.name
        );
        Self {
            settings,
            field,
            pool,
            scheduler,
            match_state,
            rng,
            save_warning: None,
        }
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn status(&self) -> MatchStatus {
        self.match_state.status()
    }

    pub fn save_warning(&self) -> Option<&str> {
        self.save_warning.as_deref()
    }

    /// Advance the match by one frame
    pub fn on_tick(&mut self, delta_secs: f64) -> MatchStatus {
        if self.status().is_terminal() {
            return self.status();
        }
        self.match_state.advance_clock(delta_secs);

        if let Some(request) = self.scheduler.tick(delta_secs) {
            let avoid = self.pool.active_bounds_except(request.index);
            let position =
                self.pool
                    .respawn_within_bounds(request.index, &avoid, &self.field, &mut self.rng);
            self.pool.activate(request.index, position);
            log::debug!(
                "spawned word {} at y={}, next in {:.2}s",
                request.index,
                position.y,
                self.scheduler.state().frequency_secs
            );
        }

        let delta_x = self.settings.motion(delta_secs);
        let live: Vec<usize> = self.pool.live_indices().collect();
        for index in live {
            self.pool.advance(index, delta_x);
            if self.pool.has_exited(index, &self.field) {
                self.match_state.on_word_expired();
                let avoid = self.pool.active_bounds_except(index);
                self.pool
                    .respawn_within_bounds(index, &avoid, &self.field, &mut self.rng);
                log::debug!(
                    "missed word {}, {} misses",
                    index,
                    self.match_state.missed_count
                );
                if self.status().is_terminal() {
                    break;
                }
            }
        }

        let status = self.status();
        if status.is_terminal() {
            log::info!(
                "match over: {status}, score {} after {:.2}s",
                self.match_state.score,
                self.match_state.elapsed_secs
            );
        }
        status
    }

    /// Match typed text against the words on the field
    pub fn submit(&mut self, text: &str) -> Option<usize> {
        if self.status().is_terminal() {
            return None;
        }
        let text = text.trim();
        let index = self.pool.resolve_submission(text)?;
        self.match_state.on_word_completed();
        log::debug!(
            "completed {:?}: {} words, score {}",
            text,
            self.match_state.words_finished,
            self.match_state.score
        );
        if self.status().is_terminal() {
            log::info!(
                "match over: {}, score {} after {:.2}s",
                self.status(),
                self.match_state.score,
                self.match_state.elapsed_secs
            );
        }
        Some(index)
    }

    /// Append this match to the score log the first time it is seen
    /// finished. A failed write is kept as a warning; the match result stands.
    pub fn save_result<S: ScoreStore + ?Sized>(&mut self, store: &S) -> Option<MatchRecord> {
        let date = Local::now().format(DATE_FORMAT).to_string();
        let record = self
            .match_state
            .take_record(&self.settings.nickname, &date)?;

        if let Err(e) = store.append(&record) {
            log::warn!("could not save score: {e}");
            self.save_warning = Some(format!("score not saved: {e}"));
        }
        Some(record)
    }

    /// New shuffle, zeroed counters, same settings
    pub fn restart(&mut self) {
        self.pool.reset(&mut self.rng);
        self.scheduler.reset();
        self.match_state = MatchState::new(
            self.pool.len(),
            self.settings.speed_setting,
            self.settings.max_freq_setting,
        );
        self.save_warning = None;
        log::info!("restarting match for {}", self.settings.nickname);
    }
}
