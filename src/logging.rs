use crate::app_dirs::AppDirs;
use env_logger::{Env, Target};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Route `log` output to the state-dir log file; the terminal belongs to the
/// game while it runs. Filtered by `RUST_LOG`, `info` by default.
pub fn init() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Err(e) = init_with_path(&path) {
        eprintln!("logging disabled: {e}");
    }
}

pub fn init_with_path(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(std::io::Error::other)
}
