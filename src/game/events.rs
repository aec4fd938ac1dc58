use super::board::CellView;

/// Input coming from the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    ThemeChosen(String),
    DifficultyChosen { rows: usize, columns: usize },
    CardClicked(usize),
    RestartRequested,
    ChangeDifficultyRequested,
    ChangeThemeRequested,
}

/// Output pushed back to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    BoardRendered(Vec<CellView>),
    GameWon,
    Error(String),
}
