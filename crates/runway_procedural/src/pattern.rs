//! # Pattern Cursor
//!
//! Walks the obstacle hierarchy one element at a time:
//!
//! ```text
//! pattern ──> super-box ──> box ──> per-lane elements
//!    │            │          │
//!    │            │          └─ all lanes done -> box placed, next box
//!    │            └─ boxes exhausted -> super-box done (override ends)
//!    └─ super-boxes exhausted -> pattern cleared, next pattern
//! ```
//!
//! The cursor owns the obstacle lane cursors. Road and sides belong to the
//! generator, which reacts to super-box selection and completion.
//!
//! ## Approach series
//!
//! An element with `write_serie` opens a series anchored at its lane cursor.
//! While the series is open, placed lengths accumulate per lane instead of
//! moving the cursors; the series is coalesced (every lane moved to the
//! farthest series front) when the next box or super-box is selected.

use rand::Rng;
use runway_content::{resolve_index, ContentLibrary, PatternElement, RefGroup};

use crate::cursor::{farthest, LaneCursor};
use crate::host::{Channel, PieceKind, Placer, SegmentPlacement, TrackHost};

/// The pattern being walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePattern {
    /// Index into the library patterns.
    pub index: usize,
    /// Next super-box reference to visit.
    pub next_super_box: usize,
}

/// The super-box being walked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveSuperBox {
    /// Index into the library super-boxes. `None` for an empty super-box.
    pub index: Option<usize>,
    /// Next box reference to visit.
    pub next_box: usize,
    /// Mirror every box of this super-box.
    pub mirrored: bool,
    /// Override road taking over the road channel, if any.
    pub override_road: Option<usize>,
    /// Vertical offset for every obstacle.
    pub y_offset: f32,
}

/// The box being placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveBox {
    /// Index into the library boxes. `None` for an empty box.
    pub index: Option<usize>,
    /// Lanes read right to left.
    pub mirrored: bool,
    next_element: Vec<usize>,
    lanes_completed: usize,
    completed: bool,
}

impl ActiveBox {
    /// Whether every lane has placed its last element.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Number of lanes done.
    #[must_use]
    pub const fn lanes_completed(&self) -> usize {
        self.lanes_completed
    }
}

/// An open approach series.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproachSerie {
    /// Cursor position the series started from.
    pub anchor: f32,
    /// Length accumulated per lane since the anchor.
    pub accumulated: Vec<f32>,
}

/// Result of moving to the next super-box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SuperBoxStep {
    /// The pattern has no super-box left and was cleared.
    PatternDone,
    /// A super-box (possibly empty) became active.
    Selected {
        /// Farthest lane cursor plus the reference gap.
        max_z: f32,
        /// Override road to take over the road channel with.
        override_road: Option<usize>,
    },
}

/// Result of moving to the next box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxStep {
    /// The super-box has no box left.
    SuperBoxDone,
    /// A box (possibly empty) became active and the lanes were aligned.
    Selected {
        /// Gap the lanes were pushed by.
        cells_before: u32,
    },
}

/// Result of placing one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementStep {
    /// Nothing to place on this lane.
    Skipped,
    /// Placed an element occupying this many cells.
    Placed(f32),
    /// Placed the final element of the box.
    CompletedBox,
}

/// Walks pattern → super-box → box → element over the obstacle lanes.
#[derive(Clone, Debug)]
pub struct PatternCursor {
    lanes: Vec<LaneCursor>,
    pattern: Option<ActivePattern>,
    super_box: Option<ActiveSuperBox>,
    active_box: Option<ActiveBox>,
    serie: Option<ApproachSerie>,
}

impl PatternCursor {
    /// Creates an idle cursor with `lane_count` lanes at `z`.
    #[must_use]
    pub fn new(lane_count: usize, z: f32) -> Self {
        Self {
            lanes: vec![LaneCursor::new(z); lane_count],
            pattern: None,
            super_box: None,
            active_box: None,
            serie: None,
        }
    }

    /// Number of obstacle lanes.
    #[inline]
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// The lane cursors.
    #[must_use]
    pub fn lanes(&self) -> &[LaneCursor] {
        &self.lanes
    }

    /// Farthest lane cursor.
    #[must_use]
    pub fn farthest(&self) -> f32 {
        farthest(&self.lanes)
    }

    /// Moves every lane to `z`.
    pub fn set_lanes(&mut self, z: f32) {
        for lane in &mut self.lanes {
            lane.set(z);
        }
    }

    /// Moves every lane behind `z` up to it.
    pub fn raise_lanes(&mut self, z: f32) {
        for lane in &mut self.lanes {
            if lane.z() < z {
                lane.set(z);
            }
        }
    }

    /// Next free position on `lane`, series included.
    #[must_use]
    pub fn lane_front(&self, lane: usize) -> LaneCursor {
        let z = self.lanes.get(lane).map_or(0.0, |cursor| cursor.z());
        match &self.serie {
            Some(serie) => {
                let acc = serie.accumulated.get(lane).copied().unwrap_or(0.0);
                LaneCursor::new(z.max(serie.anchor + acc))
            }
            None => LaneCursor::new(z),
        }
    }

    /// The active pattern.
    #[must_use]
    pub const fn pattern(&self) -> Option<ActivePattern> {
        self.pattern
    }

    /// The active super-box.
    #[must_use]
    pub const fn super_box(&self) -> Option<ActiveSuperBox> {
        self.super_box
    }

    /// The active box.
    #[must_use]
    pub const fn active_box(&self) -> Option<&ActiveBox> {
        self.active_box.as_ref()
    }

    /// The open approach series.
    #[must_use]
    pub const fn serie(&self) -> Option<&ApproachSerie> {
        self.serie.as_ref()
    }

    /// Whether the cursor needs a new box before placing anything.
    #[must_use]
    pub fn box_done(&self) -> bool {
        self.active_box.as_ref().map_or(true, ActiveBox::is_completed)
    }

    /// Moves every lane (and the series anchor) toward the player.
    pub fn scroll(&mut self, cells: f32) {
        for lane in &mut self.lanes {
            lane.scroll(cells);
        }
        if let Some(serie) = &mut self.serie {
            serie.anchor -= cells;
        }
    }

    /// Drops the whole walk. An open series is coalesced first so the lanes
    /// keep everything already placed.
    pub fn reset(&mut self) {
        self.close_serie();
        self.pattern = None;
        self.super_box = None;
        self.active_box = None;
        self.serie = None;
    }

    /// Draws a pattern from `group`.
    ///
    /// Returns `false` (and stays idle) when nothing can be drawn.
    pub fn select_pattern<R: Rng + ?Sized>(
        &mut self,
        library: &ContentLibrary,
        group: Option<usize>,
        rng: &mut R,
    ) -> bool {
        let Some(index) = draw(&library.pattern_groups, group, rng) else {
            return false;
        };
        let Some(pattern) = library.patterns.get(index) else {
            tracing::warn!("Pattern group references missing pattern {}", index);
            return false;
        };

        tracing::debug!("Pattern '{}' selected", pattern.name);
        self.pattern = Some(ActivePattern {
            index,
            next_super_box: 0,
        });
        self.super_box = None;
        self.active_box = None;
        true
    }

    /// Moves to the next super-box of the pattern.
    ///
    /// Any open series is closed first. The lanes are not moved; the caller
    /// positions them from `max_z` depending on the override.
    pub fn next_super_box<R: Rng + ?Sized>(
        &mut self,
        library: &ContentLibrary,
        rng: &mut R,
    ) -> SuperBoxStep {
        self.close_serie();
        self.super_box = None;
        self.active_box = None;

        let Some(active) = self.pattern.as_mut() else {
            return SuperBoxStep::PatternDone;
        };
        let Some(reference) = library
            .patterns
            .get(active.index)
            .and_then(|pattern| pattern.super_boxes.get(active.next_super_box))
        else {
            self.pattern = None;
            return SuperBoxStep::PatternDone;
        };
        active.next_super_box += 1;

        let max_z = self.farthest() + reference.cells_before as f32;
        let index = draw(&library.super_box_groups, resolve_index(reference.index), rng)
            .filter(|&index| index < library.super_boxes.len());

        let mut selected = ActiveSuperBox {
            index,
            next_box: 0,
            mirrored: false,
            override_road: None,
            y_offset: 0.0,
        };
        if let Some(super_box) = index.and_then(|index| library.super_boxes.get(index)) {
            selected.mirrored = super_box.random_mirror && rng.gen_bool(0.5);
            selected.y_offset = super_box.y_offset;
            selected.override_road = super_box.override_road_index();
            if let Some(road) = selected.override_road {
                if road >= library.override_roads.len() {
                    tracing::warn!(
                        "Super-box '{}' overrides missing road {}",
                        super_box.name,
                        road
                    );
                    selected.override_road = None;
                }
            }
            tracing::debug!(
                "Super-box '{}' selected (mirrored: {}, override: {:?})",
                super_box.name,
                selected.mirrored,
                selected.override_road
            );
        }

        self.super_box = Some(selected);
        SuperBoxStep::Selected {
            max_z,
            override_road: selected.override_road,
        }
    }

    /// Moves to the next box of the super-box and aligns the lanes.
    ///
    /// Coalesces any open series, then moves every lane to the farthest lane
    /// plus the box gap.
    pub fn next_box<R: Rng + ?Sized>(&mut self, library: &ContentLibrary, rng: &mut R) -> BoxStep {
        self.close_serie();
        self.active_box = None;

        let Some(super_box) = self.super_box.as_mut() else {
            return BoxStep::SuperBoxDone;
        };
        let Some(reference) = super_box
            .index
            .and_then(|index| library.super_boxes.get(index))
            .and_then(|super_box_def| super_box_def.boxes.get(super_box.next_box))
        else {
            return BoxStep::SuperBoxDone;
        };
        super_box.next_box += 1;
        let super_mirrored = super_box.mirrored;

        let target = self.farthest() + reference.cells_before as f32;
        self.set_lanes(target);

        let lane_count = self.lane_count();
        let index = draw(&library.box_groups, resolve_index(reference.index), rng)
            .filter(|&index| index < library.boxes.len());
        let active = match index.and_then(|index| library.boxes.get(index)) {
            Some(pattern_box) => {
                let mirrored = (pattern_box.random_mirror && rng.gen_bool(0.5)) || super_mirrored;
                let lanes_completed = (0..lane_count)
                    .filter(|&lane| pattern_box.lanes.get(lane).map_or(true, Vec::is_empty))
                    .count();
                ActiveBox {
                    index,
                    mirrored,
                    next_element: vec![0; lane_count],
                    lanes_completed,
                    completed: lanes_completed >= lane_count,
                }
            }
            None => ActiveBox {
                index: None,
                mirrored: false,
                next_element: vec![0; lane_count],
                lanes_completed: lane_count,
                completed: true,
            },
        };
        self.active_box = Some(active);

        BoxStep::Selected {
            cells_before: reference.cells_before,
        }
    }

    /// Ends the super-box, closing any open series.
    pub fn finish_super_box(&mut self) -> Option<ActiveSuperBox> {
        self.close_serie();
        self.active_box = None;
        self.super_box.take()
    }

    /// Places the next element of the active box on `lane`.
    ///
    /// Calling this for an exhausted lane or a completed box is a no-op, so
    /// a box is reported complete exactly once.
    pub fn place_element<R, H>(
        &mut self,
        library: &ContentLibrary,
        lane: usize,
        rng: &mut R,
        placer: &mut Placer<'_, H>,
    ) -> ElementStep
    where
        R: Rng + ?Sized,
        H: TrackHost + ?Sized,
    {
        let lane_count = self.lane_count();
        let Some(active) = self.active_box.as_mut() else {
            return ElementStep::Skipped;
        };
        if active.completed || lane >= lane_count {
            return ElementStep::Skipped;
        }
        let Some(pattern_box) = active.index.and_then(|index| library.boxes.get(index)) else {
            return ElementStep::Skipped;
        };

        let source = if active.mirrored {
            lane_count - 1 - lane
        } else {
            lane
        };
        let elements = pattern_box.lanes.get(source).map_or(&[][..], Vec::as_slice);
        let Some(element) = elements.get(active.next_element[lane]) else {
            return ElementStep::Skipped;
        };
        active.next_element[lane] += 1;
        let lane_done = active.next_element[lane] == elements.len();
        let mirrored = active.mirrored;

        if element.write_serie && self.serie.is_none() {
            self.serie = Some(ApproachSerie {
                anchor: self.lanes[lane].z(),
                accumulated: vec![0.0; lane_count],
            });
        }

        let start = self.lane_front(lane).z();
        let y_offset = self.super_box.map_or(0.0, |super_box| super_box.y_offset);
        let occupied =
            place_content(library, element, lane, start, mirrored, y_offset, rng, placer);
        self.commit(lane, start, occupied);

        if lane_done {
            if let Some(active) = self.active_box.as_mut() {
                active.lanes_completed += 1;
                if active.lanes_completed >= lane_count {
                    active.completed = true;
                    placer.box_placed();
                    return ElementStep::CompletedBox;
                }
            }
        }
        ElementStep::Placed(occupied)
    }

    /// Coalesces the open series: every lane moves to the farthest front.
    pub fn close_serie(&mut self) {
        if self.serie.is_none() {
            return;
        }
        let target = (0..self.lane_count())
            .map(|lane| self.lane_front(lane).z())
            .reduce(f32::max)
            .unwrap_or(0.0);
        self.serie = None;
        self.set_lanes(target);
    }

    fn commit(&mut self, lane: usize, start: f32, occupied: f32) {
        match &mut self.serie {
            Some(serie) => serie.accumulated[lane] = start - serie.anchor + occupied,
            None => self.lanes[lane].set(start + occupied),
        }
    }
}

/// Draws a reference from `groups[group]`.
fn draw<R: Rng + ?Sized>(groups: &[RefGroup], group: Option<usize>, rng: &mut R) -> Option<usize> {
    let group = groups.get(group?)?;
    group.choices.pick(rng).map(|choice| choice.index)
}

/// Places one element's content. Returns the cells it occupies.
#[allow(clippy::too_many_arguments)]
fn place_content<R, H>(
    library: &ContentLibrary,
    element: &PatternElement,
    lane: usize,
    start: f32,
    mirrored: bool,
    y_offset: f32,
    rng: &mut R,
    placer: &mut Placer<'_, H>,
) -> f32
where
    R: Rng + ?Sized,
    H: TrackHost + ?Sized,
{
    // Lane counts are capped at MAX_LANE_COUNT when the generator is built.
    let channel = Channel::Lane(u8::try_from(lane).unwrap_or(u8::MAX));
    let gap = element.cells_before as f32;

    let obstacle = element.content_group().and_then(|index| {
        let group = library.obstacle_groups.get(index);
        if group.is_none() {
            tracing::warn!("Pattern element references missing obstacle group {}", index);
        }
        group.and_then(|group| group.obstacles.pick(rng).map(|variant| (group, variant)))
    });

    match obstacle {
        Some((group, variant)) => {
            let placement =
                SegmentPlacement::new(channel, PieceKind::Obstacle, variant, start + gap)
                    .with_mirror(mirrored)
                    .with_y_offset(y_offset)
                    .with_coin_hint(element.coin_hint.as_deref());
            let footprint = placer.place(placement);
            gap + group.size_override.map_or(footprint, |cells| cells as f32)
        }
        None => {
            placer.empty(channel, start, element.cells_before);
            gap
        }
    }
}
