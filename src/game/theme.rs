use std::collections::HashSet;

use super::error::GameError;

const COLORS: [&str; 15] = [
    "Red", "Orange", "Yellow", "Green", "Blue", "Indigo", "Violet", "White", "Grey", "Black",
    "Brown", "Pink", "Sky Blue", "Navy", "Tan",
];

const FOOD: [&str; 15] = [
    "Apple", "Orange", "Lemon", "Watermelon", "Blueberry", "Grapes", "Plum", "Banana",
    "Raspberry", "Blackberry", "Kiwi", "Peach", "Mango", "Nectarine", "Honeydew",
];

const ANIMALS: [&str; 15] = [
    "Frog", "Tiger", "Cat", "Dog", "Hamster", "Fish", "Whale", "Monkey", "Elephant", "Giraffe",
    "Deer", "Bear", "Bird", "Dolphin", "Lion",
];

/// A named, ordered set of card faces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    name: String,
    labels: Vec<String>,
}

impl Theme {
    pub fn new<N, I, L>(name: N, labels: I) -> Result<Self, GameError>
    where
        N: Into<String>,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::InvalidTheme("theme name is empty".to_string()));
        }
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(GameError::InvalidTheme(format!("\"{name}\" has no labels")));
        }

        let mut seen = HashSet::with_capacity(labels.len());
        for label in &labels {
            if label.is_empty() {
                return Err(GameError::InvalidTheme(format!(
                    "\"{name}\" contains an empty label"
                )));
            }
            if !seen.insert(label.as_str()) {
                return Err(GameError::InvalidTheme(format!(
                    "\"{name}\" repeats the label \"{label}\""
                )));
            }
        }

        Ok(Theme { name, labels })
    }

    fn builtin(name: &str, labels: &[&str]) -> Self {
        Theme {
            name: name.to_string(),
            labels: labels.iter().map(|label| label.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The themes offered on the selection screen, in display order.
#[derive(Clone, Debug)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeCatalog {
    pub fn builtin() -> Self {
        ThemeCatalog {
            themes: vec![
                Theme::builtin("Colors", &COLORS),
                Theme::builtin("Food", &FOOD),
                Theme::builtin("Animals", &ANIMALS),
            ],
        }
    }

    pub fn from_themes(themes: Vec<Theme>) -> Self {
        ThemeCatalog { themes }
    }

    pub fn get(&self, name: &str) -> Result<&Theme, GameError> {
        self.themes
            .iter()
            .find(|theme| theme.name == name)
            .ok_or_else(|| GameError::UnknownTheme(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(Theme::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Difficulty;

    #[test]
    fn builtin_catalog_keeps_display_order() {
        let catalog = ThemeCatalog::builtin();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["Colors", "Food", "Animals"]);
    }

    #[test]
    fn builtin_themes_cover_the_largest_board() {
        let pairs = Difficulty::Large.pairs();
        for theme in ThemeCatalog::builtin().iter() {
            assert!(theme.len() >= pairs, "{} is too small", theme.name());
        }
    }

    #[test]
    fn colors_start_with_the_rainbow() {
        let catalog = ThemeCatalog::builtin();
        let colors = catalog.get("Colors").unwrap();
        assert_eq!(&colors.labels()[..3], ["Red", "Orange", "Yellow"]);
    }

    #[test]
    fn unknown_theme_is_reported_by_name() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(
            catalog.get("Planets"),
            Err(GameError::UnknownTheme("Planets".to_string()))
        );
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = Theme::new("Pets", ["Cat", "Dog", "Cat"]).unwrap_err();
        assert!(matches!(err, GameError::InvalidTheme(_)));
    }

    #[test]
    fn empty_themes_are_rejected() {
        assert!(Theme::new("Nothing", Vec::<String>::new()).is_err());
        assert!(Theme::new("  ", ["A"]).is_err());
        assert!(Theme::new("Blank", ["A", ""]).is_err());
    }
}
