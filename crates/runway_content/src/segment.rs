//! # Segment Sets and Themes
//!
//! The base track is built from themed segment sets. A set is a bag of
//! interchangeable body variants with optional begin/end caps:
//!
//! ```text
//! [begin] [body][body][body] ... [end]
//!          \______ body_place_count ______/
//! ```
//!
//! Every body length is a whole multiple of [`crate::CELL_SYNC_SIZE`] so
//! channels can always be realigned by inserting one-quantum fillers.

use serde::{Deserialize, Serialize};

use crate::weighted::{default_weight, Weighted, WeightedGroup};

/// A placeable piece of content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Opaque asset key handed to the host.
    pub handle: String,
    /// Authored footprint in cells.
    pub cells: u32,
    /// Selection weight inside its bag.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

impl Variant {
    /// Creates a variant with weight 1.
    #[must_use]
    pub fn new(handle: impl Into<String>, cells: u32) -> Self {
        Self {
            handle: handle.into(),
            cells,
            weight: 1.0,
        }
    }

    /// Sets the selection weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

impl Weighted for Variant {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// Which side channel a side set may decorate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideAffinity {
    /// Either side.
    #[default]
    Both,
    /// Left side only.
    Left,
    /// Right side only.
    Right,
}

/// One of the two side channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left border.
    Left,
    /// Right border.
    Right,
}

impl SideAffinity {
    /// Whether a set with this affinity may be used on `side`.
    #[inline]
    #[must_use]
    pub const fn matches(self, side: Side) -> bool {
        matches!(
            (self, side),
            (Self::Both, _) | (Self::Left, Side::Left) | (Self::Right, Side::Right)
        )
    }
}

/// A themed bag of body variants with optional caps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentSet {
    /// Human-readable name.
    pub name: String,
    /// Placed once when the set starts.
    #[serde(default)]
    pub begin: Option<Variant>,
    /// Placed once when the set ends.
    #[serde(default)]
    pub end: Option<Variant>,
    /// Interchangeable body pieces.
    #[serde(default)]
    pub bodies: WeightedGroup<Variant>,
    /// How many bodies are placed before the set ends.
    pub body_place_count: u32,
    /// Selection weight among the theme's sets.
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Side restriction (ignored on the road).
    #[serde(default)]
    pub affinity: SideAffinity,
}

impl SegmentSet {
    /// Creates a set with no caps and the given bodies.
    #[must_use]
    pub fn new(name: impl Into<String>, bodies: Vec<Variant>, body_place_count: u32) -> Self {
        Self {
            name: name.into(),
            begin: None,
            end: None,
            bodies: WeightedGroup::new(bodies),
            body_place_count,
            weight: 1.0,
            affinity: SideAffinity::Both,
        }
    }

    /// Sets the begin and end caps.
    #[must_use]
    pub fn with_caps(mut self, begin: Option<Variant>, end: Option<Variant>) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    /// Sets the side affinity.
    #[must_use]
    pub fn with_affinity(mut self, affinity: SideAffinity) -> Self {
        self.affinity = affinity;
        self
    }

    /// Sets the selection weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Every variant of the set, caps included.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.begin
            .iter()
            .chain(self.bodies.items())
            .chain(self.end.iter())
    }

    /// The first body variant, used as the one-quantum sync filler.
    #[must_use]
    pub fn canonical_body(&self) -> Option<&Variant> {
        self.bodies.item(0)
    }
}

impl Weighted for SegmentSet {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// Maps normalized run progress to a pattern group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternProgressRef {
    /// Progress (0..=1) from which this entry applies.
    pub from: f32,
    /// Index into the library's pattern groups.
    pub group: usize,
}

/// A visual theme: caps, road/side sets and pattern progression.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    /// Human-readable name.
    pub name: String,
    /// Full-width piece placed when the theme starts.
    #[serde(default)]
    pub begin_cap: Option<Variant>,
    /// Full-width piece placed when the theme ends.
    #[serde(default)]
    pub end_cap: Option<Variant>,
    /// Road sets. Index 0 supplies the canonical road filler.
    #[serde(default)]
    pub road_sets: WeightedGroup<SegmentSet>,
    /// Side sets. Index 0 must have `Both` affinity.
    #[serde(default)]
    pub side_sets: WeightedGroup<SegmentSet>,
    /// Piecewise progress -> pattern group mapping, ascending `from`.
    #[serde(default)]
    pub pattern_progress: Vec<PatternProgressRef>,
    /// Road cells generated before the theme ends.
    pub body_cells: u32,
}

impl Theme {
    /// Rebuilds the cached weights of every bag the theme owns.
    pub fn refresh_weights(&mut self) {
        self.road_sets.update();
        self.side_sets.update();
        for set in self
            .road_sets
            .items_mut()
            .iter_mut()
            .chain(self.side_sets.items_mut().iter_mut())
        {
            set.bodies.update();
        }
    }

    /// Pattern group for the given progress.
    ///
    /// Picks the last entry whose `from` is not above `progress`, or the first
    /// entry when progress is below all of them.
    #[must_use]
    pub fn pattern_group_for(&self, progress: f32) -> Option<usize> {
        let progress = progress.clamp(0.0, 1.0);
        self.pattern_progress
            .iter()
            .filter(|entry| entry.from <= progress)
            .last()
            .or_else(|| self.pattern_progress.first())
            .map(|entry| entry.group)
    }

    /// The canonical side filler: body 0 of side set 0.
    #[must_use]
    pub fn side_filler(&self) -> Option<&Variant> {
        self.side_sets.item(0).and_then(SegmentSet::canonical_body)
    }

    /// The canonical road filler: body 0 of road set 0.
    #[must_use]
    pub fn road_filler(&self) -> Option<&Variant> {
        self.road_sets.item(0).and_then(SegmentSet::canonical_body)
    }
}
