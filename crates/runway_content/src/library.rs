//! # Content Library
//!
//! Arena of all authored content for a run, plus loading and validation.
//!
//! ## Loading
//!
//! ```rust,ignore
//! let library = ContentLibrary::load_toml_path("data/content/city.toml")?;
//! ```
//!
//! `load_*` parses, prepares (pads boxes, builds weight caches) and validates.
//! `from_*` only parses and prepares; the generator still never trusts an
//! index blindly, so unvalidated content degrades instead of panicking.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentIssue, ContentResult};
use crate::pattern::{
    resolve_index, ObstacleGroup, ObstaclePattern, PatternBox, PatternSuperBox, RefGroup,
};
use crate::segment::{SegmentSet, SideAffinity, Theme, Variant};
use crate::weighted::{Weighted, WeightedGroup};
use crate::{CELL_SYNC_SIZE, DEFAULT_LANE_COUNT, MAX_LANE_COUNT};

/// All authored content for a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentLibrary {
    /// Number of parallel obstacle lanes.
    #[serde(default = "default_lane_count")]
    pub lane_count: usize,
    /// Theme slots, in play order. Empty = every theme in order.
    #[serde(default)]
    pub rotation: Vec<usize>,
    /// Themes.
    #[serde(default)]
    pub themes: Vec<Theme>,
    /// Road sets a super-box can take over the road with.
    #[serde(default)]
    pub override_roads: Vec<SegmentSet>,
    /// Pattern groups (choices index `patterns`).
    #[serde(default)]
    pub pattern_groups: Vec<RefGroup>,
    /// Obstacle patterns.
    #[serde(default)]
    pub patterns: Vec<ObstaclePattern>,
    /// Super-box groups (choices index `super_boxes`).
    #[serde(default)]
    pub super_box_groups: Vec<RefGroup>,
    /// Super-boxes.
    #[serde(default)]
    pub super_boxes: Vec<PatternSuperBox>,
    /// Box groups (choices index `boxes`).
    #[serde(default)]
    pub box_groups: Vec<RefGroup>,
    /// Boxes.
    #[serde(default)]
    pub boxes: Vec<PatternBox>,
    /// Obstacle groups (targets of element content).
    #[serde(default)]
    pub obstacle_groups: Vec<ObstacleGroup>,
}

const fn default_lane_count() -> usize {
    DEFAULT_LANE_COUNT
}

impl Default for ContentLibrary {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            rotation: Vec::new(),
            themes: Vec::new(),
            override_roads: Vec::new(),
            pattern_groups: Vec::new(),
            patterns: Vec::new(),
            super_box_groups: Vec::new(),
            super_boxes: Vec::new(),
            box_groups: Vec::new(),
            boxes: Vec::new(),
            obstacle_groups: Vec::new(),
        }
    }
}

impl ContentLibrary {
    /// Parses and prepares content from TOML, without validation.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Parse`] if the text is not valid content TOML.
    pub fn from_toml_str(text: &str) -> ContentResult<Self> {
        let mut library: Self = toml::from_str(text)?;
        library.prepare();
        Ok(library)
    }

    /// Reads, parses and prepares a content file, without validation.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Io`] or [`ContentError::Parse`].
    pub fn from_toml_path(path: impl AsRef<Path>) -> ContentResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parses, prepares and validates content from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Invalid`] listing every authoring defect.
    pub fn load_toml_str(text: &str) -> ContentResult<Self> {
        let library = Self::from_toml_str(text)?;
        library.validate().map_err(ContentError::Invalid)?;
        Ok(library)
    }

    /// Reads, parses, prepares and validates a content file.
    ///
    /// # Errors
    ///
    /// See [`ContentLibrary::load_toml_str`].
    pub fn load_toml_path(path: impl AsRef<Path>) -> ContentResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::load_toml_str(&text)
    }

    /// Pads every box to the lane count and rebuilds every weight cache.
    pub fn prepare(&mut self) {
        let lane_count = self.lane_count;
        for pattern_box in &mut self.boxes {
            pattern_box.pad_lanes(lane_count);
        }
        self.refresh_weights();
    }

    /// Rebuilds every cumulative-weight cache in the library.
    pub fn refresh_weights(&mut self) {
        for theme in &mut self.themes {
            theme.refresh_weights();
        }
        for set in &mut self.override_roads {
            set.bodies.update();
        }
        for group in self
            .pattern_groups
            .iter_mut()
            .chain(self.super_box_groups.iter_mut())
            .chain(self.box_groups.iter_mut())
        {
            group.choices.update();
        }
        for group in &mut self.obstacle_groups {
            group.obstacles.update();
        }
    }

    /// Theme index occupying rotation slot `slot` (wraps around).
    #[must_use]
    pub fn theme_for_slot(&self, slot: usize) -> Option<usize> {
        if self.rotation.is_empty() {
            if self.themes.is_empty() {
                None
            } else {
                Some(slot % self.themes.len())
            }
        } else {
            Some(self.rotation[slot % self.rotation.len()])
        }
    }

    /// Every body variant of every road/side/override set.
    pub fn body_variants(&self) -> impl Iterator<Item = &Variant> {
        self.themes
            .iter()
            .flat_map(|theme| theme.road_sets.items().iter().chain(theme.side_sets.items()))
            .chain(&self.override_roads)
            .flat_map(|set| set.bodies.items())
    }

    /// Checks every cross reference and authoring invariant.
    ///
    /// # Errors
    ///
    /// Returns every issue found; an empty list is never returned as `Err`.
    pub fn validate(&self) -> Result<(), Vec<ContentIssue>> {
        let mut issues = Vec::new();

        if self.themes.is_empty() {
            issues.push(ContentIssue::NoThemes);
        }
        if self.lane_count > MAX_LANE_COUNT {
            issues.push(ContentIssue::BadLaneCount {
                lanes: self.lane_count,
                max: MAX_LANE_COUNT,
            });
        }
        for &index in &self.rotation {
            check_index(&mut issues, "rotation", "theme", index, self.themes.len());
        }

        for theme in &self.themes {
            self.validate_theme(theme, &mut issues);
        }
        for set in &self.override_roads {
            validate_set(&format!("override road '{}'", set.name), set, &mut issues);
        }

        let groups = [
            ("pattern group", &self.pattern_groups, "pattern", self.patterns.len()),
            ("super-box group", &self.super_box_groups, "super-box", self.super_boxes.len()),
            ("box group", &self.box_groups, "box", self.boxes.len()),
        ];
        for (kind, arena, target, len) in groups {
            for group in arena {
                let owner = format!("{kind} '{}'", group.name);
                check_group(&mut issues, &owner, "choices", &group.choices);
                for choice in group.choices.items() {
                    check_index(&mut issues, &owner, target, choice.index, len);
                }
            }
        }

        for pattern in &self.patterns {
            let owner = format!("pattern '{}'", pattern.name);
            if pattern.super_boxes.is_empty() {
                issues.push(ContentIssue::EmptyGroup {
                    owner: owner.clone(),
                    what: "super-box list",
                });
            }
            for reference in &pattern.super_boxes {
                if let Some(index) = resolve_index(reference.index) {
                    check_index(&mut issues, &owner, "super-box group", index, self.super_box_groups.len());
                }
            }
        }

        for super_box in &self.super_boxes {
            let owner = format!("super-box '{}'", super_box.name);
            for reference in &super_box.boxes {
                if let Some(index) = resolve_index(reference.index) {
                    check_index(&mut issues, &owner, "box group", index, self.box_groups.len());
                }
            }
            if let Some(index) = super_box.override_road_index() {
                check_index(&mut issues, &owner, "override road", index, self.override_roads.len());
            }
        }

        for pattern_box in &self.boxes {
            let owner = format!("box '{}'", pattern_box.name);
            if pattern_box.lanes.len() > self.lane_count {
                issues.push(ContentIssue::TooManyLanes {
                    name: pattern_box.name.clone(),
                    lanes: pattern_box.lanes.len(),
                    expected: self.lane_count,
                });
            }
            for element in pattern_box.lanes.iter().flatten() {
                if let Some(index) = element.content_group() {
                    check_index(&mut issues, &owner, "obstacle group", index, self.obstacle_groups.len());
                }
            }
        }

        for group in &self.obstacle_groups {
            let owner = format!("obstacle group '{}'", group.name);
            check_group(&mut issues, &owner, "obstacles", &group.obstacles);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    fn validate_theme(&self, theme: &Theme, issues: &mut Vec<ContentIssue>) {
        let owner = format!("theme '{}'", theme.name);
        check_group(issues, &owner, "road sets", &theme.road_sets);
        check_group(issues, &owner, "side sets", &theme.side_sets);

        for set in theme.road_sets.items().iter().chain(theme.side_sets.items()) {
            validate_set(&format!("{owner} set '{}'", set.name), set, issues);
        }

        if let Some(first) = theme.side_sets.item(0) {
            if first.affinity != SideAffinity::Both {
                issues.push(ContentIssue::MissingCanonicalSideSet {
                    theme: theme.name.clone(),
                });
            }
        }
        for (channel, filler) in [("road", theme.road_filler()), ("side", theme.side_filler())] {
            if let Some(filler) = filler {
                if filler.cells != CELL_SYNC_SIZE {
                    issues.push(ContentIssue::BadFiller {
                        theme: theme.name.clone(),
                        channel,
                        cells: filler.cells,
                        quantum: CELL_SYNC_SIZE,
                    });
                }
            }
        }

        if theme.pattern_progress.is_empty() {
            issues.push(ContentIssue::EmptyGroup {
                owner: owner.clone(),
                what: "pattern progression",
            });
        }
        for entry in &theme.pattern_progress {
            check_index(issues, &owner, "pattern group", entry.group, self.pattern_groups.len());
        }
    }
}

fn validate_set(owner: &str, set: &SegmentSet, issues: &mut Vec<ContentIssue>) {
    check_group(issues, owner, "bodies", &set.bodies);
    for variant in set.variants() {
        if variant.cells % CELL_SYNC_SIZE != 0 {
            issues.push(ContentIssue::NotQuantum {
                owner: owner.to_string(),
                handle: variant.handle.clone(),
                cells: variant.cells,
                quantum: CELL_SYNC_SIZE,
            });
        }
    }
}

fn check_group<T: Weighted>(
    issues: &mut Vec<ContentIssue>,
    owner: &str,
    what: &'static str,
    group: &WeightedGroup<T>,
) {
    if group.is_empty() {
        issues.push(ContentIssue::EmptyGroup {
            owner: owner.to_string(),
            what,
        });
    } else if !group.items().iter().any(|item| item.weight() > 0.0) {
        issues.push(ContentIssue::ZeroWeight {
            owner: owner.to_string(),
            what,
        });
    }
}

fn check_index(
    issues: &mut Vec<ContentIssue>,
    owner: &str,
    what: &'static str,
    index: usize,
    len: usize,
) {
    if index >= len {
        issues.push(ContentIssue::DanglingIndex {
            owner: owner.to_string(),
            what,
            index,
            len,
        });
    }
}
