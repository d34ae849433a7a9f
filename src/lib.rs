pub mod app;
pub mod app_dirs;
pub mod config;
pub mod geometry;
pub mod leaderboard;
pub mod logging;
pub mod match_state;
pub mod runtime;
pub mod session;
pub mod spawn;
pub mod ui;
pub mod vocabulary;
pub mod word_pool;
