use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use stantyper::{
    app::{App, Control},
    config::{Config, ConfigStore, FileConfigStore, GameSettings},
    geometry::PlayField,
    leaderboard::{FileScoreStore, ScoreStore, TOP_SCORES},
    logging,
    runtime::{CrosstermInput, GameEvent, Runner, FRAME_INTERVAL},
    session::GameSession,
    ui::scoreboard::format_table,
    vocabulary::Vocabulary,
};

/// type the words before they cross the screen
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing game: words drift across the field and you clear them by typing them. Ten misses and the game is over. Scores go to a local top-10 board."
)]
pub struct Cli {
    /// name recorded on the scoreboard (spaces are removed)
    #[clap(short = 'n', long)]
    nickname: Option<String>,

    /// word speed, 1 (slow) to 10 (fast)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..=10))]
    speed: Option<u32>,

    /// fastest spawn interval in tenths of a second, 5 to 10
    #[clap(short = 'f', long, value_parser = clap::value_parser!(u32).range(5..=10))]
    max_frequency: Option<u32>,

    /// word list to play with: a JSON word file or whitespace-separated words
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// score log to read and append to
    #[clap(long)]
    scores_file: Option<PathBuf>,

    /// store the given options as the new defaults
    #[clap(long)]
    save_config: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// print the best scores and exit
    Scores {
        /// how many entries to show
        #[clap(short = 'n', long, default_value_t = TOP_SCORES)]
        count: usize,
    },
}

impl Cli {
    /// Command-line values win over the stored config
    fn merge_into(&self, mut cfg: Config) -> Config {
        if let Some(nickname) = &self.nickname {
            cfg.nickname = Some(nickname.clone());
        }
        if let Some(speed) = self.speed {
            cfg.speed_setting = speed;
        }
        if let Some(freq) = self.max_frequency {
            cfg.max_freq_setting = freq;
        }
        if let Some(words) = &self.words {
            cfg.words_file = Some(words.clone());
        }
        if let Some(scores) = &self.scores_file {
            cfg.scores_file = Some(scores.clone());
        }
        cfg
    }
}

fn score_store(cfg: &Config) -> FileScoreStore {
    match &cfg.scores_file {
        Some(path) => FileScoreStore::with_path(path),
        None => FileScoreStore::new(),
    }
}

fn load_vocabulary(cfg: &Config) -> Result<Vocabulary, Box<dyn Error>> {
    let vocabulary = match &cfg.words_file {
        Some(path) => Vocabulary::from_path(path)?,
        None => Vocabulary::builtin()?,
    };
    Ok(vocabulary)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init();

    let config_store = FileConfigStore::new();
    let cfg = cli.merge_into(config_store.load());
    if cli.save_config {
        config_store.save(&cfg)?;
    }

    let store = score_store(&cfg);

    if let Some(Command::Scores { count }) = cli.command {
        for line in format_table(&store.top_n(count)?) {
            println!("{line}");
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let vocabulary = load_vocabulary(&cfg)?;
    let session = GameSession::new(&vocabulary, GameSettings::from(&cfg), PlayField::default());
    let mut app = App::new(session, store);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, S: ScoreStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermInput::new(), FRAME_INTERVAL);

    loop {
        match runner.step() {
            GameEvent::Tick(delta_secs) => app.on_tick(delta_secs),
            GameEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    return Ok(());
                }
            }
            GameEvent::Resize => {}
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }
}
