use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Roughly 60 frames per second
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Longest step a single frame may take. A suspended or stalled terminal
/// resumes where it stopped instead of flushing every word off the field.
pub const MAX_FRAME_SECS: f64 = 0.25;

/// What the terminal reports between frames
#[derive(Clone, Debug)]
pub enum TerminalInput {
    Key(KeyEvent),
    Resize,
}

/// Event handed to the game loop. `Tick` carries the seconds of play the
/// frame covers.
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick(f64),
}

pub trait InputSource {
    /// Wait up to `timeout` for input; `None` once the timeout passes
    fn wait(&self, timeout: Duration) -> Option<TerminalInput>;
}

/// Reads crossterm events on a background thread
pub struct CrosstermInput {
    rx: Receiver<TerminalInput>,
}

impl CrosstermInput {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let input = match event::read() {
                // release events on some platforms would type every letter twice
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    TerminalInput::Key(key)
                }
                Ok(CtEvent::Resize(_, _)) => TerminalInput::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("terminal event reader stopped: {e}");
                    break;
                }
            };
            if tx.send(input).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for CrosstermInput {
    fn wait(&self, timeout: Duration) -> Option<TerminalInput> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Input fed through a channel, for headless runs
pub struct ChannelInput {
    rx: Receiver<TerminalInput>,
}

impl ChannelInput {
    pub fn new(rx: Receiver<TerminalInput>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    fn wait(&self, timeout: Duration) -> Option<TerminalInput> {
        match self.rx.recv_timeout(timeout) {
            Ok(input) => Some(input),
            Err(RecvTimeoutError::Timeout) => None,
            // a closed channel still has to pace the frames
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(timeout);
                None
            }
        }
    }
}

/// Frame deadlines on a fixed cadence
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    interval: Duration,
    last_frame: Instant,
    next_frame: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last_frame: start,
            next_frame: start + interval,
        }
    }

    /// Time left before the next frame is due; zero when overdue
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Close the current frame and return the seconds it covered
    pub fn fire(&mut self, now: Instant) -> f64 {
        let delta = now.saturating_duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.next_frame = now + self.interval;
        delta.min(MAX_FRAME_SECS)
    }
}

/// Interleaves terminal input with frame ticks. A tick that is due is
/// delivered before any queued input, so fast typing cannot stall the field.
pub struct Runner<I: InputSource> {
    input: I,
    clock: FrameClock,
}

impl<I: InputSource> Runner<I> {
    pub fn new(input: I, interval: Duration) -> Self {
        Self {
            input,
            clock: FrameClock::new(interval, Instant::now()),
        }
    }

    pub fn step(&mut self) -> GameEvent {
        let now = Instant::now();
        if self.clock.is_due(now) {
            return GameEvent::Tick(self.clock.fire(now));
        }
        match self.input.wait(self.clock.until_next(now)) {
            Some(TerminalInput::Key(key)) => GameEvent::Key(key),
            Some(TerminalInput::Resize) => GameEvent::Resize,
            None => GameEvent::Tick(self.clock.fire(Instant::now())),
        }
    }
}
