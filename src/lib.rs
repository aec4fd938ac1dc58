pub mod config;
pub mod game;
pub mod logging;

#[cfg(feature = "gui")]
pub mod ui;
