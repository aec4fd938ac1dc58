use thiserror::Error;

/// Everything the game core can refuse to do.
///
/// None of these are fatal: the flow reports them to the presentation layer
/// and keeps whatever screen was active before the failing event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("theme \"{theme}\" has {available} labels but {pairs} pairs are needed")]
    Configuration {
        theme: String,
        pairs: usize,
        available: usize,
    },
    #[error("position {position} is outside the board (0..{len})")]
    InvalidPosition { position: usize, len: usize },
    #[error("unsupported difficulty {rows}x{columns}")]
    UnsupportedDifficulty { rows: usize, columns: usize },
    #[error("unknown theme \"{0}\"")]
    UnknownTheme(String),
    #[error("invalid theme: {0}")]
    InvalidTheme(String),
}
