use std::fmt;
use std::str::FromStr;

use super::error::GameError;

/// Grid sizes offered to the player, as rows x columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Small,
    Medium,
    Large,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Small, Difficulty::Medium, Difficulty::Large];

    pub fn config(self) -> (usize, usize) {
        match self {
            Difficulty::Small => (3, 4),
            Difficulty::Medium => (4, 5),
            Difficulty::Large => (5, 6),
        }
    }

    pub fn rows(self) -> usize {
        self.config().0
    }

    pub fn columns(self) -> usize {
        self.config().1
    }

    pub fn cells(self) -> usize {
        let (rows, columns) = self.config();
        rows * columns
    }

    pub fn pairs(self) -> usize {
        self.cells() / 2
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Small => "3x4",
            Difficulty::Medium => "4x5",
            Difficulty::Large => "5x6",
        }
    }

    pub fn from_dimensions(rows: usize, columns: usize) -> Result<Self, GameError> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.config() == (rows, columns))
            .ok_or(GameError::UnsupportedDifficulty { rows, columns })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unsupported = GameError::UnsupportedDifficulty { rows: 0, columns: 0 };
        let (rows, columns) = value
            .trim()
            .to_ascii_lowercase()
            .split_once('x')
            .map(|(rows, columns)| (rows.trim().to_string(), columns.trim().to_string()))
            .ok_or_else(|| unsupported.clone())?;
        let rows = rows.parse().map_err(|_| unsupported.clone())?;
        let columns = columns.parse().map_err(|_| unsupported)?;
        Self::from_dimensions(rows, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_board_has_an_even_cell_count() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.cells() % 2, 0);
            assert_eq!(difficulty.pairs() * 2, difficulty.cells());
        }
    }

    #[test]
    fn pair_counts_match_the_grid() {
        assert_eq!(Difficulty::Small.pairs(), 6);
        assert_eq!(Difficulty::Medium.pairs(), 10);
        assert_eq!(Difficulty::Large.pairs(), 15);
    }

    #[test]
    fn labels_parse_back() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.name().parse::<Difficulty>(), Ok(difficulty));
        }
        assert_eq!(" 4X5 ".parse::<Difficulty>(), Ok(Difficulty::Medium));
    }

    #[test]
    fn other_sizes_are_unsupported() {
        assert_eq!(
            Difficulty::from_dimensions(4, 4),
            Err(GameError::UnsupportedDifficulty { rows: 4, columns: 4 })
        );
        assert!("4x3".parse::<Difficulty>().is_err());
        assert!("big".parse::<Difficulty>().is_err());
    }
}
