/// Seconds between the first spawns of a match
pub const INITIAL_FREQUENCY_SECS: f64 = 1.0;
/// How much quicker each spawn makes the next one
pub const FREQUENCY_STEP_SECS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnState {
    pub next_index: usize,
    pub frequency_secs: f64,
    pub accumulated_secs: f64,
}

/// Ask the session to bring the word at `index` onto the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRequest {
    pub index: usize,
}

/// Releases words in pool order, one every `frequency_secs`, speeding up
/// towards `max_frequency`
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    state: SpawnState,
    max_frequency: f64,
    total_words: usize,
}

impl SpawnScheduler {
    pub fn new(total_words: usize, max_frequency: f64) -> Self {
        Self {
            state: Self::initial_state(max_frequency),
            max_frequency,
            total_words,
        }
    }

    fn initial_state(max_frequency: f64) -> SpawnState {
        SpawnState {
            next_index: 0,
            frequency_secs: INITIAL_FREQUENCY_SECS.max(max_frequency),
            accumulated_secs: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.state = Self::initial_state(self.max_frequency);
    }

    pub fn state(&self) -> &SpawnState {
        &self.state
    }

    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    /// Every word has been released
    pub fn is_idle(&self) -> bool {
        self.state.next_index >= self.total_words
    }

    pub fn tick(&mut self, delta_secs: f64) -> Option<SpawnRequest> {
        self.state.accumulated_secs += delta_secs.max(0.0);

        if self.is_idle() || self.state.accumulated_secs < self.state.frequency_secs {
            return None;
        }

        let request = SpawnRequest {
            index: self.state.next_index,
        };
        self.state.next_index += 1;
        self.state.accumulated_secs = 0.0;
        self.state.frequency_secs =
            (self.state.frequency_secs - FREQUENCY_STEP_SECS).max(self.max_frequency);
        Some(request)
    }
}
