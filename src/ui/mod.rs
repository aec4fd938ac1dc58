//! GTK front end. Widgets only mirror what the game core pushes to them.

pub mod app;
mod board;
mod dialogs;
mod hud;
mod scene;
pub mod scheduler;
mod state;
