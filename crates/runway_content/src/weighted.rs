//! # Weighted Selection
//!
//! Probability-weighted discrete sampling over a fixed collection.
//!
//! Every authored bag in the content (road sets, side sets, body variants,
//! obstacles, pattern/super-box/box choices) is a [`WeightedGroup`] over
//! some `T: Weighted`. The group keeps a running cumulative-sum cache:
//!
//! ```text
//! weights     [ 2.0, 0.0, 3.0, 5.0 ]
//! cumulative  [ 2.0, 2.0, 5.0, 10.0 ]
//! sample = u * 10.0, u ~ U[0, 1)  ->  first cumulative >= sample
//! ```
//!
//! The cache is NOT kept in sync automatically. Call [`WeightedGroup::update`]
//! after editing weights, before trusting [`WeightedGroup::get`].

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Anything that exposes a selection weight.
pub trait Weighted {
    /// Non-negative selection weight. Negative values are treated as zero.
    fn weight(&self) -> f32;
}

/// A weighted collection with a derived cumulative-weight cache.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedGroup<T> {
    /// The authored items.
    items: Vec<T>,
    /// Running cumulative weights (derived, rebuilt by `update`).
    #[serde(skip)]
    cumulative: Vec<f32>,
}

impl<T> Default for WeightedGroup<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cumulative: Vec::new(),
        }
    }
}

impl<T: Weighted> WeightedGroup<T> {
    /// Creates a group and builds its cache.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let mut group = Self {
            items,
            cumulative: Vec::new(),
        };
        group.update();
        group
    }

    /// Rebuilds the cumulative-weight cache from the current item weights.
    pub fn update(&mut self) {
        self.cumulative.clear();
        self.cumulative.reserve(self.items.len());
        let mut running = 0.0f32;
        for item in &self.items {
            running += item.weight().max(0.0);
            self.cumulative.push(running);
        }
    }

    /// Draws an index.
    ///
    /// Returns `None` only for an empty group. A degenerate cache (zero total,
    /// stale length, NaN) falls back to index 0.
    pub fn get<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        if self.cumulative.len() != self.items.len() {
            return Some(0);
        }

        let total = self.total_weight();
        if total <= 0.0 || !total.is_finite() {
            return Some(0);
        }

        let sample = rng.gen::<f32>() * total;
        let picked = self
            .cumulative
            .iter()
            .zip(&self.items)
            .position(|(&cumulative, item)| cumulative >= sample && item.weight() > 0.0);
        Some(picked.unwrap_or(0))
    }

    /// Rebuilds the cache, then draws.
    pub fn update_and_get<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        self.update();
        self.get(rng)
    }

    /// Draws an item.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        self.get(rng).and_then(|index| self.items.get(index))
    }

    /// Total weight according to the cache.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

impl<T> WeightedGroup<T> {
    /// Returns the item at `index`.
    #[inline]
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// All items, in authored order.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable access to the items. Call `update` afterwards.
    #[inline]
    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Appends an item. Call `update` afterwards.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the group has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A weighted reference into another arena (pattern, super-box, box).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedRef {
    /// Index into the referenced arena.
    pub index: usize,
    /// Selection weight.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

impl WeightedRef {
    /// Creates a reference with the given weight.
    #[must_use]
    pub const fn new(index: usize, weight: f32) -> Self {
        Self { index, weight }
    }
}

impl Weighted for WeightedRef {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// Default weight for authored items that omit one.
pub(crate) const fn default_weight() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn group(weights: &[f32]) -> WeightedGroup<WeightedRef> {
        WeightedGroup::new(
            weights
                .iter()
                .enumerate()
                .map(|(index, &weight)| WeightedRef::new(index, weight))
                .collect(),
        )
    }

    #[test]
    fn test_cumulative_cache() {
        let group = group(&[2.0, 0.0, 3.0, 5.0]);
        assert_eq!(group.cumulative, vec![2.0, 2.0, 5.0, 10.0]);
        assert!((group.total_weight() - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_get_always_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let group = group(&[0.5, 3.0, 0.0, 1.25, 9.0]);
        for _ in 0..10_000 {
            let index = group.get(&mut rng).unwrap();
            assert!(index < group.len());
            assert_ne!(index, 2, "zero-weight item must never be drawn");
        }
    }

    #[test]
    fn test_single_nonzero_weight_always_wins() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let group = group(&[0.0, 0.0, 4.0, 0.0]);
        for _ in 0..10_000 {
            assert_eq!(group.get(&mut rng), Some(2));
        }
    }

    #[test]
    fn test_zero_total_falls_back_to_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let group = group(&[0.0, 0.0, 0.0]);
        assert_eq!(group.get(&mut rng), Some(0));
    }

    #[test]
    fn test_empty_group_yields_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let group = group(&[]);
        assert_eq!(group.get(&mut rng), None);
        assert!(group.pick(&mut rng).is_none());
    }

    #[test]
    fn test_default_needs_no_default_items() {
        #[derive(Deserialize)]
        struct Bag {
            #[serde(default)]
            refs: WeightedGroup<WeightedRef>,
        }

        let group: WeightedGroup<WeightedRef> = WeightedGroup::default();
        assert!(group.is_empty());
        assert!(group.total_weight().abs() < f32::EPSILON);

        let bag: Bag = toml::from_str("").unwrap();
        assert!(bag.refs.is_empty());
    }

    #[test]
    fn test_stale_cache_until_update() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut group = group(&[0.0, 1.0]);
        group.push(WeightedRef::new(2, 50.0));

        // Cache length no longer matches the items.
        assert_eq!(group.get(&mut rng), Some(0));

        group.items_mut()[1].weight = 0.0;
        group.items_mut()[2].weight = 0.0;
        group.items_mut()[0].weight = 1.0;
        for _ in 0..1000 {
            assert_eq!(group.update_and_get(&mut rng), Some(0));
        }

        group.items_mut()[0].weight = 0.0;
        group.items_mut()[1].weight = 1.0;
        for _ in 0..1000 {
            assert_eq!(group.update_and_get(&mut rng), Some(1));
        }
    }

    #[test]
    fn test_distribution_roughly_follows_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let group = group(&[1.0, 3.0]);
        let mut hits = [0u32; 2];
        for _ in 0..40_000 {
            hits[group.get(&mut rng).unwrap()] += 1;
        }
        let ratio = f64::from(hits[1]) / f64::from(hits[0]);
        assert!((2.6..3.4).contains(&ratio), "ratio {ratio} should be near 3");
    }
}
