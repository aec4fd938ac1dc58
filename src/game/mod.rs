//! Toolkit-agnostic game core: dealing, the board, the match controller and
//! the screen flow that ties them together.

pub mod board;
pub mod controller;
pub mod deal;
pub mod difficulty;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod session;
pub mod theme;

pub use board::{Board, Card, CardState, CellView, HIDDEN_MARKER, Resolution, Reveal};
pub use controller::{DEFAULT_MISMATCH_DELAY, MatchController, Phase};
pub use deal::{deal, shuffle};
pub use difficulty::Difficulty;
pub use error::GameError;
pub use events::{InputEvent, Notification};
pub use scheduler::{ManualScheduler, ScheduledTask, Scheduler, TaskId};
pub use session::{Flow, GameSession, Screen, ScreenKind, Transition};
pub use theme::{Theme, ThemeCatalog};
