//! # Obstacle Pattern Hierarchy
//!
//! Obstacles are authored as a four-level composition:
//!
//! ```text
//! ObstaclePattern ── [SuperBoxReference] ──> super-box group ──> PatternSuperBox
//! PatternSuperBox ── [BoxReference]      ──> box group       ──> PatternBox
//! PatternBox      ── lane -> [PatternElement]
//! PatternElement  ── content             ──> obstacle group  ──> Variant
//! ```
//!
//! All references are indices into the library arenas. Negative indices on
//! references and elements mean "empty": the slot only contributes its
//! `cells_before` gap.

use serde::{Deserialize, Serialize};

use crate::segment::Variant;
use crate::weighted::{WeightedGroup, WeightedRef};

/// Converts an authored signed index into an arena index.
#[inline]
#[must_use]
pub const fn resolve_index(index: i32) -> Option<usize> {
    if index < 0 {
        None
    } else {
        Some(index as usize)
    }
}

/// A single slot on one lane of a box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternElement {
    /// Obstacle group index. Negative = empty slot.
    #[serde(default = "empty_index")]
    pub content: i32,
    /// Opens (or joins) an approach series.
    #[serde(default)]
    pub write_serie: bool,
    /// Gap before the element, in cells.
    #[serde(default)]
    pub cells_before: u32,
    /// Coin placement hint, passed through to the host untouched.
    #[serde(default)]
    pub coin_hint: Option<String>,
}

impl PatternElement {
    /// An empty slot with no gap.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            content: -1,
            write_serie: false,
            cells_before: 0,
            coin_hint: None,
        }
    }

    /// An empty slot that only reserves `cells_before` cells.
    #[must_use]
    pub const fn gap(cells_before: u32) -> Self {
        Self {
            content: -1,
            write_serie: false,
            cells_before,
            coin_hint: None,
        }
    }

    /// An obstacle slot drawing from `group`.
    #[must_use]
    pub const fn obstacle(group: usize, cells_before: u32) -> Self {
        Self {
            content: group as i32,
            write_serie: false,
            cells_before,
            coin_hint: None,
        }
    }

    /// Marks the element as part of an approach series.
    #[must_use]
    pub const fn in_serie(mut self) -> Self {
        self.write_serie = true;
        self
    }

    /// The obstacle group, if any.
    #[inline]
    #[must_use]
    pub const fn content_group(&self) -> Option<usize> {
        resolve_index(self.content)
    }
}

/// A block of per-lane element lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternBox {
    /// Human-readable name.
    pub name: String,
    /// Lanes may be mirrored with a 50/50 roll.
    #[serde(default)]
    pub random_mirror: bool,
    /// Element list per lane, lane 0 first.
    #[serde(default)]
    pub lanes: Vec<Vec<PatternElement>>,
}

impl PatternBox {
    /// Creates a box from per-lane element lists.
    #[must_use]
    pub fn new(name: impl Into<String>, lanes: Vec<Vec<PatternElement>>) -> Self {
        Self {
            name: name.into(),
            random_mirror: false,
            lanes,
        }
    }

    /// Pads the box to exactly `lane_count` non-empty lanes.
    ///
    /// Missing lanes and empty lanes get a single empty element. Extra lanes
    /// are left alone (reported by validation, ignored by the generator).
    pub fn pad_lanes(&mut self, lane_count: usize) {
        if self.lanes.len() < lane_count {
            self.lanes.resize_with(lane_count, Vec::new);
        }
        for lane in &mut self.lanes {
            if lane.is_empty() {
                lane.push(PatternElement::empty());
            }
        }
    }
}

/// A reference from a super-box to a box group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxReference {
    /// Box group index. Negative = empty box.
    pub index: i32,
    /// Gap before the box, in cells.
    #[serde(default)]
    pub cells_before: u32,
}

/// An ordered run of boxes sharing mirror state and an optional road override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternSuperBox {
    /// Human-readable name.
    pub name: String,
    /// Boxes in order.
    #[serde(default)]
    pub boxes: Vec<BoxReference>,
    /// Vertical offset handed to the host for every obstacle in the super-box.
    #[serde(default)]
    pub y_offset: f32,
    /// Override road index. Negative = no override.
    #[serde(default = "empty_index")]
    pub override_road: i32,
    /// All boxes may be mirrored with a 50/50 roll.
    #[serde(default)]
    pub random_mirror: bool,
}

impl PatternSuperBox {
    /// The override road, if any.
    #[inline]
    #[must_use]
    pub const fn override_road_index(&self) -> Option<usize> {
        resolve_index(self.override_road)
    }
}

/// A reference from a pattern to a super-box group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperBoxReference {
    /// Super-box group index. Negative = empty super-box.
    pub index: i32,
    /// Gap before the super-box, in cells.
    #[serde(default)]
    pub cells_before: u32,
}

/// A top-level obstacle pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePattern {
    /// Human-readable name.
    pub name: String,
    /// Super-boxes in order.
    #[serde(default)]
    pub super_boxes: Vec<SuperBoxReference>,
}

/// A weighted bag of interchangeable obstacles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObstacleGroup {
    /// Human-readable name.
    pub name: String,
    /// Footprint used instead of the obstacle's own length.
    #[serde(default)]
    pub size_override: Option<u32>,
    /// The obstacles.
    #[serde(default)]
    pub obstacles: WeightedGroup<Variant>,
}

/// A named weighted bag of references (pattern, super-box or box group).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RefGroup {
    /// Human-readable name.
    pub name: String,
    /// The weighted choices.
    #[serde(default)]
    pub choices: WeightedGroup<WeightedRef>,
}

impl RefGroup {
    /// Creates a group from `(index, weight)` pairs.
    #[must_use]
    pub fn new(name: impl Into<String>, choices: &[(usize, f32)]) -> Self {
        Self {
            name: name.into(),
            choices: WeightedGroup::new(
                choices
                    .iter()
                    .map(|&(index, weight)| WeightedRef::new(index, weight))
                    .collect(),
            ),
        }
    }
}

const fn empty_index() -> i32 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_index_is_empty() {
        assert_eq!(resolve_index(-1), None);
        assert_eq!(resolve_index(-42), None);
        assert_eq!(resolve_index(0), Some(0));
        assert_eq!(resolve_index(7), Some(7));
    }

    #[test]
    fn test_pad_short_box() {
        let mut pattern_box = PatternBox::new(
            "short",
            vec![vec![PatternElement::obstacle(0, 5)], Vec::new()],
        );
        pattern_box.pad_lanes(3);

        assert_eq!(pattern_box.lanes.len(), 3);
        assert_eq!(pattern_box.lanes[1], vec![PatternElement::empty()]);
        assert_eq!(pattern_box.lanes[2], vec![PatternElement::empty()]);
    }

    #[test]
    fn test_pad_keeps_extra_lanes() {
        let mut pattern_box = PatternBox::new("wide", vec![Vec::new(); 5]);
        pattern_box.pad_lanes(3);
        assert_eq!(pattern_box.lanes.len(), 5);
        assert!(pattern_box.lanes.iter().all(|lane| lane.len() == 1));
    }
}
