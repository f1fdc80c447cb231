use std::collections::BTreeMap;

use plotters::style::RGBColor;
use rand::{Rng, SeedableRng, rngs::StdRng};
use replog_domain::Name;

/// Ephemeral per-exercise display colors.
///
/// Colors are drawn uniformly at random from the full 24-bit space and are
/// neither guaranteed distinct nor persisted. Every catalog change and
/// every explicit shuffle regenerates all of them together.
pub struct SeriesColors {
    colors: BTreeMap<Name, RGBColor>,
    rng: StdRng,
}

impl SeriesColors {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            colors: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn shuffle<'a>(&mut self, names: impl IntoIterator<Item = &'a Name>) {
        let rng = &mut self.rng;
        self.colors = names
            .into_iter()
            .map(|name| {
                (
                    name.clone(),
                    RGBColor(rng.random(), rng.random(), rng.random()),
                )
            })
            .collect();
    }

    #[must_use]
    pub fn get(&self, name: &Name) -> Option<RGBColor> {
        self.colors.get(name).copied()
    }

    #[must_use]
    pub fn colors(&self) -> &BTreeMap<Name, RGBColor> {
        &self.colors
    }
}

impl Default for SeriesColors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn names() -> Vec<Name> {
        vec![
            Name::new("Pushups").unwrap(),
            Name::new("Squats").unwrap(),
        ]
    }

    #[test]
    fn test_shuffle_assigns_color_to_every_name() {
        let mut colors = SeriesColors::with_seed(0);
        colors.shuffle(&names());

        assert_eq!(
            colors.colors().keys().collect::<Vec<_>>(),
            names().iter().collect::<Vec<_>>()
        );
        assert!(names().iter().all(|name| colors.get(name).is_some()));
    }

    #[test]
    fn test_shuffle_regenerates_all_colors() {
        let mut colors = SeriesColors::with_seed(0);
        colors.shuffle(&names());
        let first = colors.colors().clone();

        colors.shuffle(&names());
        let second = colors.colors().clone();

        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            second.keys().collect::<Vec<_>>()
        );
        assert_ne!(first, second);
    }

    #[test]
    fn test_shuffle_is_deterministic_per_seed() {
        let mut a = SeriesColors::with_seed(7);
        let mut b = SeriesColors::with_seed(7);
        a.shuffle(&names());
        b.shuffle(&names());

        assert_eq!(a.colors(), b.colors());
    }

    #[test]
    fn test_shuffle_drops_removed_names() {
        let mut colors = SeriesColors::with_seed(0);
        colors.shuffle(&names());

        let squats = Name::new("Squats").unwrap();
        colors.shuffle([&squats]);

        assert!(colors.get(&Name::new("Pushups").unwrap()).is_none());
        assert!(colors.get(&squats).is_some());
    }
}
