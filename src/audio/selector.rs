use std::sync::Arc;

use crate::{audio::catalog::Sound, common::rng::SharedRng};

/// Picks a sound with probability proportional to its weight.
pub struct WeightedSelector {
    rng: Arc<SharedRng>,
}

impl WeightedSelector {
    pub fn new(rng: Arc<SharedRng>) -> Self {
        Self { rng }
    }

    /// `None` when no sound has a positive weight.
    pub fn select<'a>(&self, sounds: &'a [Arc<Sound>]) -> Option<&'a Arc<Sound>> {
        let total = total_weight(sounds.iter().map(|s| s.weight()));
        if total == 0 {
            return None;
        }
        let n = self.rng.below(0..total);
        pick(sounds, |s| s.weight(), n)
    }
}

/// Saturates instead of wrapping when weights are absurdly large.
fn total_weight(weights: impl Iterator<Item = i64>) -> u64 {
    weights.fold(0u64, |total, w| total.saturating_add(w.max(0) as u64))
}

/// First item whose cumulative weight exceeds `n`, in slice order.
/// Non-positive weights add nothing and so are never picked.
fn pick<T>(items: &[T], weight: impl Fn(&T) -> i64, n: u64) -> Option<&T> {
    let mut cumulative = 0u64;
    items.iter().find(|item| {
        cumulative = cumulative.saturating_add(weight(item).max(0) as u64);
        n < cumulative
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sounds(weights: &[(&str, i64)]) -> Vec<Arc<Sound>> {
        weights
            .iter()
            .map(|&(name, w)| Arc::new(Sound::new(name, w, Vec::new())))
            .collect()
    }

    #[test]
    fn pick_walks_cumulative_weights() {
        let items = [("a", 3), ("b", 0), ("c", 2)];
        let name = |n| pick(&items, |i| i.1, n).map(|i| i.0);
        assert_eq!(name(0), Some("a"));
        assert_eq!(name(2), Some("a"));
        assert_eq!(name(3), Some("c"));
        assert_eq!(name(4), Some("c"));
        assert_eq!(name(5), None);
    }

    #[test]
    fn distribution_follows_weights() {
        let catalog = sounds(&[("A", 1000), ("B", 10)]);
        let selector = WeightedSelector::new(Arc::new(SharedRng::seeded(0x5eed)));

        let draws = 100_000;
        let b_hits = (0..draws)
            .filter(|_| selector.select(&catalog).map(|s| s.name()) == Some("B"))
            .count();

        let expected = 10.0 / 1010.0;
        let observed = b_hits as f64 / draws as f64;
        assert!(
            (observed - expected).abs() < 0.002,
            "observed {observed}, expected {expected}"
        );
    }

    #[test]
    fn non_positive_weights_are_unreachable() {
        let catalog = sounds(&[("zero", 0), ("negative", -50), ("only", 1)]);
        let selector = WeightedSelector::new(Arc::new(SharedRng::seeded(3)));
        for _ in 0..1_000 {
            assert_eq!(selector.select(&catalog).map(|s| s.name()), Some("only"));
        }
    }

    #[test]
    fn all_zero_weights_select_nothing() {
        let selector = WeightedSelector::new(Arc::new(SharedRng::seeded(3)));
        assert!(selector.select(&sounds(&[("a", 0), ("b", -1)])).is_none());
        assert!(selector.select(&[]).is_none());
    }

    #[test]
    fn huge_weights_saturate_instead_of_wrapping() {
        let items = [("a", i64::MAX), ("b", i64::MAX), ("c", i64::MAX)];
        assert_eq!(total_weight(items.iter().map(|i| i.1)), u64::MAX);

        // Two maxed weights sum to u64::MAX - 1; the third saturates.
        let name = |n| pick(&items, |i| i.1, n).map(|i| i.0);
        assert_eq!(name(u64::MAX - 2), Some("b"));
        assert_eq!(name(u64::MAX - 1), Some("c"));

        let selector = WeightedSelector::new(Arc::new(SharedRng::seeded(9)));
        let catalog = sounds(&items);
        for _ in 0..100 {
            assert!(selector.select(&catalog).is_some());
        }
    }
}
