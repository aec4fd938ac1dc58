use rand::Rng;

use super::deal::deal;
use super::difficulty::Difficulty;
use super::error::GameError;
use super::theme::Theme;

/// What a face-down card shows.
pub const HIDDEN_MARKER: &str = "?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub position: usize,
    pub face: String,
    pub state: CardState,
}

/// Render snapshot of one cell. `face` is withheld while the card is hidden.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub position: usize,
    pub state: CardState,
    pub face: Option<String>,
}

impl CellView {
    pub fn display(&self) -> &str {
        self.face.as_deref().unwrap_or(HIDDEN_MARKER)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    Revealed,
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Matched(usize, usize),
    Mismatched(usize, usize),
}

#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    cards: Vec<Card>,
    selection: Vec<usize>,
}

impl Board {
    /// Lays `faces` out row by row. The caller guarantees `faces` fills the
    /// grid and holds every value exactly twice.
    pub fn new(difficulty: Difficulty, faces: Vec<String>) -> Self {
        let (rows, columns) = difficulty.config();
        debug_assert_eq!(faces.len(), rows * columns);
        let cards = faces
            .into_iter()
            .enumerate()
            .map(|(position, face)| Card {
                position,
                face,
                state: CardState::Hidden,
            })
            .collect();
        Board {
            rows,
            columns,
            cards,
            selection: Vec::with_capacity(2),
        }
    }

    pub fn deal<R: Rng>(
        theme: &Theme,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let faces = deal(theme, difficulty.pairs(), rng)?;
        Ok(Self::new(difficulty, faces))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.state == CardState::Matched)
            .count()
            / 2
    }

    fn check_position(&self, position: usize) -> Result<(), GameError> {
        if position < self.cards.len() {
            Ok(())
        } else {
            Err(GameError::InvalidPosition {
                position,
                len: self.cards.len(),
            })
        }
    }

    /// Turns a hidden card face up and adds it to the selection.
    pub fn reveal(&mut self, position: usize) -> Result<Reveal, GameError> {
        self.check_position(position)?;
        if self.selection.len() >= 2 || self.cards[position].state != CardState::Hidden {
            return Ok(Reveal::Rejected);
        }
        self.cards[position].state = CardState::Revealed;
        self.selection.push(position);
        Ok(Reveal::Revealed)
    }

    /// Compares the two selected cards. A match is settled on the spot; a
    /// mismatch stays face up until [`Board::hide_selection`].
    pub fn resolve_selection_match(&mut self) -> Option<Resolution> {
        let &[first, second] = self.selection.as_slice() else {
            return None;
        };
        if self.cards[first].face == self.cards[second].face {
            self.cards[first].state = CardState::Matched;
            self.cards[second].state = CardState::Matched;
            self.selection.clear();
            Some(Resolution::Matched(first, second))
        } else {
            Some(Resolution::Mismatched(first, second))
        }
    }

    pub fn hide_selection(&mut self) {
        for &position in &self.selection {
            let card = &mut self.cards[position];
            if card.state == CardState::Revealed {
                card.state = CardState::Hidden;
            }
        }
        self.selection.clear();
    }

    pub fn is_complete(&self) -> bool {
        self.cards.iter().all(|card| card.state == CardState::Matched)
    }

    pub fn cells(&self) -> Vec<CellView> {
        self.cards
            .iter()
            .map(|card| CellView {
                position: card.position,
                state: card.state,
                face: (card.state != CardState::Hidden).then(|| card.face.clone()),
            })
            .collect()
    }

    /// Cards currently face up but not matched.
    pub fn revealed_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.state == CardState::Revealed)
            .count()
    }
}
