//! Dealing: pick the faces for a board and shuffle them.

use rand::Rng;
use tracing::debug;

use super::error::GameError;
use super::theme::Theme;

/// Deals `pairs` pairs from `theme`.
///
/// Faces are the first `pairs` labels of the theme in its own order, each
/// pushed twice, then shuffled in place.
pub fn deal<R: Rng>(
    theme: &Theme,
    pairs: usize,
    rng: &mut R,
) -> Result<Vec<String>, GameError> {
    if pairs > theme.len() {
        return Err(GameError::Configuration {
            theme: theme.name().to_string(),
            pairs,
            available: theme.len(),
        });
    }

    let mut faces = Vec::with_capacity(pairs * 2);
    for label in &theme.labels()[..pairs] {
        faces.push(label.clone());
        faces.push(label.clone());
    }
    shuffle(&mut faces, rng);

    debug!(theme = theme.name(), pairs, "dealt board faces");
    Ok(faces)
}

/// Fisher-Yates: walk from the last slot down to 1 and swap each slot with a
/// uniformly chosen slot in `[0, i]`.
pub fn shuffle<T, R: Rng>(values: &mut [T], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.random_range(0..=i);
        values.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::game::{Difficulty, ThemeCatalog};

    fn counts(values: &[String]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for value in values {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn colors_on_the_small_board_use_the_first_six_labels() {
        let catalog = ThemeCatalog::builtin();
        let colors = catalog.get("Colors").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let faces = deal(colors, Difficulty::Small.pairs(), &mut rng).unwrap();

        assert_eq!(faces.len(), 12);
        let mut sorted = faces.clone();
        sorted.sort();
        let mut expected: Vec<String> = ["Red", "Orange", "Yellow", "Green", "Blue", "Indigo"]
            .iter()
            .flat_map(|label| [label.to_string(), label.to_string()])
            .collect();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn every_dealt_face_appears_exactly_twice() {
        let catalog = ThemeCatalog::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for theme in catalog.iter() {
            for difficulty in Difficulty::ALL {
                let faces = deal(theme, difficulty.pairs(), &mut rng).unwrap();
                let counts = counts(&faces);
                assert_eq!(counts.len(), difficulty.pairs());
                assert!(counts.values().all(|&count| count == 2));
            }
        }
    }

    #[test]
    fn too_many_pairs_is_a_configuration_error() {
        let theme = Theme::new("Tiny", ["A", "B"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            deal(&theme, 3, &mut rng),
            Err(GameError::Configuration {
                theme: "Tiny".to_string(),
                pairs: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn zero_pairs_deals_nothing() {
        let theme = Theme::new("Tiny", ["A"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(deal(&theme, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn same_seed_same_layout() {
        let catalog = ThemeCatalog::builtin();
        let food = catalog.get("Food").unwrap();
        let first = deal(food, 10, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        let second = deal(food, 10, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_leaves_short_slices_alone() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![42];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![42]);
    }
}
