//! # Track Generator
//!
//! Per-tick orchestration of every channel:
//!
//! ```text
//! advance(distance, progress)
//!   ├─ scroll every cursor toward the player
//!   ├─ base pass      road + sides up to their build-ahead
//!   │                  (override active: override road only, sides follow)
//!   │                  (theme budget spent: end theme, next theme)
//!   └─ obstacle pass  pattern elements up to the obstacle build-ahead
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut generator = TrackGenerator::new(library, GeneratorConfig::default(), TrackSeed::new(7))?;
//! loop {
//!     generator.advance(player_speed * dt, run_progress, &mut host);
//! }
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runway_content::{
    ContentLibrary, SegmentSet, Theme, Variant, WeightedGroup, MAX_LANE_COUNT,
};

use crate::channel::SegmentChannel;
use crate::config::{GeneratorConfig, TrackSeed};
use crate::error::{GeneratorError, GeneratorResult};
use crate::host::{Channel, PieceKind, Placer, TrackHost};
use crate::pattern::{BoxStep, ElementStep, PatternCursor, SuperBoxStep};
use crate::sync::synchronize;

/// Theme changes allowed within one tick.
const MAX_THEME_CHANGES_PER_TICK: u32 = 8;

/// Pattern/super-box/box selections tried before giving up for this tick.
const SELECTION_BUDGET: u32 = 32;

/// An override road currently owning the road channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveOverride {
    /// Index into the library override roads.
    pub road: usize,
    /// Bodies placed so far.
    pub bodies_placed: u32,
}

/// All mutable selection state of a run.
#[derive(Clone, Debug)]
pub struct GeneratorState {
    road: SegmentChannel,
    left: SegmentChannel,
    right: SegmentChannel,
    pattern: PatternCursor,
    override_road: Option<ActiveOverride>,
    theme: usize,
    theme_slot: usize,
    theme_cells: f32,
    traveled_cells: f64,
    progress: f32,
}

impl GeneratorState {
    fn new(library: &ContentLibrary, config: &GeneratorConfig) -> Self {
        Self {
            road: SegmentChannel::new(Channel::Road, 0.0),
            left: SegmentChannel::new(Channel::LeftSide, 0.0),
            right: SegmentChannel::new(Channel::RightSide, 0.0),
            pattern: PatternCursor::new(library.lane_count, config.obstacle_start),
            override_road: None,
            theme: library.theme_for_slot(0).unwrap_or(0),
            theme_slot: 0,
            theme_cells: 0.0,
            traveled_cells: 0.0,
            progress: 0.0,
        }
    }

    /// Road channel.
    #[must_use]
    pub const fn road(&self) -> &SegmentChannel {
        &self.road
    }

    /// Left side channel.
    #[must_use]
    pub const fn left(&self) -> &SegmentChannel {
        &self.left
    }

    /// Right side channel.
    #[must_use]
    pub const fn right(&self) -> &SegmentChannel {
        &self.right
    }

    /// Pattern walk and obstacle lanes.
    #[must_use]
    pub const fn pattern(&self) -> &PatternCursor {
        &self.pattern
    }

    /// The override road in control of the road channel, if any.
    #[must_use]
    pub const fn override_road(&self) -> Option<ActiveOverride> {
        self.override_road
    }

    /// Active theme index.
    #[must_use]
    pub const fn theme(&self) -> usize {
        self.theme
    }

    /// Rotation slot of the active theme (keeps counting past the rotation length).
    #[must_use]
    pub const fn theme_slot(&self) -> usize {
        self.theme_slot
    }

    /// Road cells placed since the active theme began.
    #[must_use]
    pub const fn theme_cells(&self) -> f32 {
        self.theme_cells
    }

    /// Cells traveled since the run started.
    #[must_use]
    pub const fn traveled_cells(&self) -> f64 {
        self.traveled_cells
    }

    /// Last run progress handed in by the host.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    fn scroll(&mut self, cells: f32) {
        for channel in [&mut self.road, &mut self.left, &mut self.right] {
            channel.cursor_mut().scroll(cells);
        }
        self.pattern.scroll(cells);
        self.traveled_cells += f64::from(cells);
    }

    fn match_sides(&mut self) {
        let z = self.road.z();
        self.left.cursor_mut().set(z);
        self.right.cursor_mut().set(z);
    }
}

/// Counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    /// `advance` calls.
    pub ticks: u64,
    /// Pieces handed to the host.
    pub pieces_placed: u64,
    /// Sync passes run.
    pub sync_passes: u64,
    /// Sync fillers inserted.
    pub fillers_placed: u64,
    /// Themes started, the first one included.
    pub themes_started: u64,
    /// Patterns drawn.
    pub patterns_selected: u64,
    /// Super-boxes entered.
    pub super_boxes_entered: u64,
    /// Boxes drawn.
    pub boxes_selected: u64,
    /// Boxes placed on every lane.
    pub boxes_completed: u64,
    /// Override roads started.
    pub overrides_started: u64,
    /// Generation steps that made no progress (bad content).
    pub stalled_steps: u64,
}

/// The endless track generator.
///
/// One per run; owns the content, the RNG stream and all run state.
pub struct TrackGenerator {
    library: ContentLibrary,
    config: GeneratorConfig,
    seed: TrackSeed,
    rng: ChaCha8Rng,
    state: GeneratorState,
    stats: GeneratorStats,
    started: bool,
}

impl TrackGenerator {
    /// Creates a generator. Nothing is placed until [`TrackGenerator::start`]
    /// or the first [`TrackGenerator::advance`].
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::NoThemes`] for a library without themes,
    /// [`GeneratorError::TooManyLanes`] when lanes cannot be addressed and
    /// [`GeneratorError::InvalidConfig`] for out-of-range tuning.
    pub fn new(
        library: ContentLibrary,
        config: GeneratorConfig,
        seed: TrackSeed,
    ) -> GeneratorResult<Self> {
        config.validate()?;
        if library.themes.is_empty() {
            return Err(GeneratorError::NoThemes);
        }
        if library.lane_count > MAX_LANE_COUNT {
            return Err(GeneratorError::TooManyLanes(library.lane_count));
        }

        let state = GeneratorState::new(&library, &config);
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed.value()),
            library,
            config,
            seed,
            state,
            stats: GeneratorStats::default(),
            started: false,
        })
    }

    /// Places the first theme's begin cap. No-op once started.
    pub fn start<H: TrackHost + ?Sized>(&mut self, host: &mut H) {
        if self.started {
            return;
        }
        self.started = true;
        self.refresh_theme_weights();

        let mut pass = self.pass(host);
        pass.begin_theme();
        pass.finish();
    }

    /// Advances the run by `traveled_distance` world units and generates
    /// whatever fell inside the build-ahead distances.
    ///
    /// `progress` is the normalized run progress (0..=1) used to pick
    /// pattern groups.
    pub fn advance<H: TrackHost + ?Sized>(
        &mut self,
        traveled_distance: f32,
        progress: f32,
        host: &mut H,
    ) {
        if !self.started {
            self.start(host);
        }

        let cells = self.config.to_cells(traveled_distance.max(0.0));
        self.state.scroll(cells);
        if progress.is_finite() {
            self.state.progress = progress.clamp(0.0, 1.0);
        }

        for _ in 0..MAX_THEME_CHANGES_PER_TICK {
            let mut pass = self.pass(host);
            let theme_ended = pass.generate_base();
            pass.finish();
            if !theme_ended {
                break;
            }
            self.refresh_theme_weights();
        }

        let mut pass = self.pass(host);
        pass.generate_obstacles();
        pass.finish();

        self.stats.ticks += 1;
    }

    /// Session restart: same seed, fresh state. The next `advance` replays
    /// the run from the beginning.
    pub fn restart(&mut self) {
        self.restart_with_seed(self.seed);
    }

    /// Session restart with a new seed.
    pub fn restart_with_seed(&mut self, seed: TrackSeed) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed.value());
        self.state = GeneratorState::new(&self.library, &self.config);
        self.stats = GeneratorStats::default();
        self.started = false;
        tracing::info!("Track generator restarted with seed {:#x}", seed.value());
    }

    /// The content being played.
    #[must_use]
    pub const fn library(&self) -> &ContentLibrary {
        &self.library
    }

    /// Generator tuning.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The run seed.
    #[must_use]
    pub const fn seed(&self) -> TrackSeed {
        self.seed
    }

    /// All run state.
    #[must_use]
    pub const fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Diagnostics counters.
    #[must_use]
    pub const fn stats(&self) -> &GeneratorStats {
        &self.stats
    }

    /// Whether the first theme has been started.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// The active theme.
    #[must_use]
    pub fn current_theme(&self) -> Option<&Theme> {
        self.library.themes.get(self.state.theme)
    }

    /// Rebuilds the weights of the active theme and the pattern groups it uses.
    fn refresh_theme_weights(&mut self) {
        let Some(theme) = self.library.themes.get_mut(self.state.theme) else {
            return;
        };
        theme.refresh_weights();
        for entry in &theme.pattern_progress {
            if let Some(group) = self.library.pattern_groups.get_mut(entry.group) {
                group.choices.update();
            }
        }
    }

    fn pass<'s, H: TrackHost + ?Sized>(&'s mut self, host: &'s mut H) -> Pass<'s, 's, H> {
        Pass {
            library: &self.library,
            config: &self.config,
            rng: &mut self.rng,
            placer: Placer::new(host, self.state.traveled_cells),
            state: &mut self.state,
            stats: &mut self.stats,
        }
    }
}

/// One generation pass: borrowed run state plus the placement sink.
struct Pass<'a, 'h, H: TrackHost + ?Sized> {
    library: &'a ContentLibrary,
    config: &'a GeneratorConfig,
    rng: &'a mut ChaCha8Rng,
    state: &'a mut GeneratorState,
    stats: &'a mut GeneratorStats,
    placer: Placer<'h, H>,
}

impl<'a, H: TrackHost + ?Sized> Pass<'a, '_, H> {
    fn finish(self) {
        self.stats.pieces_placed += self.placer.placed();
    }

    fn theme(&self) -> Option<&'a Theme> {
        let library: &'a ContentLibrary = self.library;
        library.themes.get(self.state.theme)
    }

    /// Road and sides. Returns `true` when the theme changed.
    fn generate_base(&mut self) -> bool {
        if self.state.override_road.is_some() {
            self.extend_override(self.config.road_build_ahead);
            self.state.match_sides();
            return false;
        }
        let Some(theme) = self.theme() else {
            return false;
        };

        let budget = theme.body_cells as f32;
        let mut steps = 0;
        while self.state.road.cursor().needs_content(self.config.road_build_ahead)
            && steps < self.config.max_steps_per_tick
        {
            steps += 1;
            if self.state.theme_cells >= budget {
                self.end_theme(theme);
                return true;
            }
            let cells = self
                .state
                .road
                .step(&theme.road_sets, self.rng, &mut self.placer);
            self.state.theme_cells += cells;
            if cells <= 0.0 && self.state.road.is_idle() {
                self.stall(Channel::Road);
                break;
            }
        }

        let target = self.config.side_build_ahead;
        let max_steps = self.config.max_steps_per_tick;
        let (_, left_ok) = fill_channel(
            &mut self.state.left,
            &theme.side_sets,
            target,
            max_steps,
            self.rng,
            &mut self.placer,
        );
        if !left_ok {
            self.stall(Channel::LeftSide);
        }
        let (_, right_ok) = fill_channel(
            &mut self.state.right,
            &theme.side_sets,
            target,
            max_steps,
            self.rng,
            &mut self.placer,
        );
        if !right_ok {
            self.stall(Channel::RightSide);
        }
        false
    }

    /// Sync, end cap, next theme from the rotation, begin cap.
    fn end_theme(&mut self, theme: &'a Theme) {
        self.sync(theme);
        self.state.pattern.reset();
        if let Some(cap) = &theme.end_cap {
            self.place_full_width(PieceKind::ThemeEnd, cap);
        }

        self.state.theme_slot += 1;
        let next = self
            .library
            .theme_for_slot(self.state.theme_slot)
            .filter(|&index| index < self.library.themes.len());
        match next {
            Some(index) => self.state.theme = index,
            None => tracing::warn!(
                "Rotation slot {} has no valid theme, keeping '{}'",
                self.state.theme_slot,
                theme.name
            ),
        }
        tracing::info!(
            "Theme '{}' ended after {:.0} road cells",
            theme.name,
            self.state.theme_cells
        );
        self.begin_theme();
    }

    fn begin_theme(&mut self) {
        let Some(theme) = self.theme() else {
            return;
        };
        if let Some(cap) = &theme.begin_cap {
            self.place_full_width(PieceKind::ThemeBegin, cap);
        }
        self.state.match_sides();
        let z = self.state.road.z();
        self.state.pattern.raise_lanes(z);
        self.state.theme_cells = 0.0;
        self.stats.themes_started += 1;
        tracing::info!(
            "Theme '{}' started (slot {}) at cell {:.0}",
            theme.name,
            self.state.theme_slot,
            self.state.traveled_cells + f64::from(z)
        );
    }

    fn generate_obstacles(&mut self) {
        let library = self.library;
        let threshold = self.config.obstacle_build_ahead;
        let lane_count = self.state.pattern.lane_count();

        for _ in 0..self.config.max_steps_per_tick {
            let hungry = (0..lane_count)
                .any(|lane| self.state.pattern.lane_front(lane).needs_content(threshold));
            if !hungry {
                break;
            }
            if self.state.pattern.box_done() {
                if !self.select_next_box() {
                    break;
                }
                continue;
            }

            let mut progressed = false;
            for lane in 0..lane_count {
                if !self.state.pattern.lane_front(lane).needs_content(threshold) {
                    continue;
                }
                match self
                    .state
                    .pattern
                    .place_element(library, lane, self.rng, &mut self.placer)
                {
                    ElementStep::Skipped => {}
                    ElementStep::Placed(_) => progressed = true,
                    ElementStep::CompletedBox => {
                        progressed = true;
                        self.stats.boxes_completed += 1;
                        break;
                    }
                }
            }
            // Hungry lanes are exhausted; the rest of the box is beyond reach.
            if !progressed {
                break;
            }
        }
    }

    /// Walks the hierarchy until a box is active. Returns `false` when no box
    /// could be selected within the budget.
    fn select_next_box(&mut self) -> bool {
        let library = self.library;
        for _ in 0..SELECTION_BUDGET {
            if self.state.pattern.super_box().is_none() {
                if self.state.pattern.pattern().is_none() {
                    let group = self
                        .theme()
                        .and_then(|theme| theme.pattern_group_for(self.state.progress));
                    if !self.state.pattern.select_pattern(library, group, self.rng) {
                        return false;
                    }
                    self.stats.patterns_selected += 1;
                }
                if let SuperBoxStep::Selected {
                    max_z,
                    override_road,
                } = self.state.pattern.next_super_box(library, self.rng)
                {
                    self.enter_super_box(max_z, override_road);
                }
                continue;
            }

            match self.state.pattern.next_box(library, self.rng) {
                BoxStep::SuperBoxDone => self.leave_super_box(),
                BoxStep::Selected { .. } => {
                    self.stats.boxes_selected += 1;
                    return true;
                }
            }
        }
        false
    }

    fn enter_super_box(&mut self, max_z: f32, override_road: Option<usize>) {
        self.stats.super_boxes_entered += 1;
        let library = self.library;
        let (Some(road_index), Some(theme)) = (override_road, self.theme()) else {
            self.state.pattern.set_lanes(max_z);
            return;
        };
        let Some(override_set) = library.override_roads.get(road_index) else {
            self.state.pattern.set_lanes(max_z);
            return;
        };

        let max_steps = self.config.max_steps_per_tick;
        let (cells, _) = fill_channel(
            &mut self.state.road,
            &theme.road_sets,
            max_z,
            max_steps,
            self.rng,
            &mut self.placer,
        );
        self.state.theme_cells += cells;
        for side in [&mut self.state.left, &mut self.state.right] {
            fill_channel(side, &theme.side_sets, max_z, max_steps, self.rng, &mut self.placer);
        }
        self.sync(theme);

        let z = self.state.road.z();
        self.state.pattern.raise_lanes(z);
        if let Some(cap) = &override_set.begin {
            self.place_full_width(PieceKind::OverrideBegin, cap);
        }
        self.state.override_road = Some(ActiveOverride {
            road: road_index,
            bodies_placed: 0,
        });
        self.stats.overrides_started += 1;
        tracing::debug!("Override road '{}' takes over at z={:.1}", override_set.name, z);
    }

    fn leave_super_box(&mut self) {
        self.state.pattern.finish_super_box();
        let Some(active) = self.state.override_road else {
            return;
        };

        let library = self.library;
        let farthest = self.state.pattern.farthest();
        self.extend_override(farthest);
        if let Some(cap) = library
            .override_roads
            .get(active.road)
            .and_then(|set| set.end.as_ref())
        {
            self.place_full_width(PieceKind::OverrideEnd, cap);
        }
        self.state.match_sides();
        let z = self.state.road.z();
        self.state.pattern.raise_lanes(z);
        self.state.override_road = None;
        tracing::debug!(
            "Override road ended after {} bodies at z={:.1}",
            active.bodies_placed,
            z
        );
    }

    /// Places override bodies until the road reaches `target`.
    fn extend_override(&mut self, target: f32) {
        let Some(active) = self.state.override_road else {
            return;
        };
        let library = self.library;
        let Some(set) = library.override_roads.get(active.road) else {
            self.state.override_road = None;
            return;
        };

        let mut steps = 0;
        while self.state.road.cursor().needs_content(target)
            && steps < self.config.max_steps_per_tick
        {
            steps += 1;
            let Some(body) = set.bodies.pick(self.rng) else {
                self.stall(Channel::Road);
                break;
            };
            let cells = self
                .state
                .road
                .place_piece(PieceKind::OverrideBody, body, &mut self.placer);
            self.state.theme_cells += cells;
            if let Some(active) = &mut self.state.override_road {
                active.bodies_placed += 1;
            }
            if cells <= 0.0 {
                self.stall(Channel::Road);
                break;
            }
        }
    }

    fn place_full_width(&mut self, kind: PieceKind, variant: &Variant) {
        let cells = self.state.road.place_piece(kind, variant, &mut self.placer);
        if matches!(kind, PieceKind::OverrideBegin | PieceKind::OverrideEnd) {
            self.state.theme_cells += cells;
        }
        self.state.match_sides();
    }

    fn sync(&mut self, theme: &Theme) {
        let report = synchronize(
            &mut self.state.road,
            &mut self.state.left,
            &mut self.state.right,
            theme,
            self.config.sync_tolerance,
            &mut self.placer,
        );
        self.stats.sync_passes += 1;
        self.stats.fillers_placed += u64::from(report.total());
    }

    fn stall(&mut self, channel: Channel) {
        self.stats.stalled_steps += 1;
        tracing::warn!("No progress generating {:?}, content may be broken", channel);
    }
}

/// Steps a channel until its cursor reaches `target`.
///
/// Returns the cells placed and whether the channel kept making progress.
fn fill_channel<H: TrackHost + ?Sized>(
    channel: &mut SegmentChannel,
    sets: &WeightedGroup<SegmentSet>,
    target: f32,
    max_steps: u32,
    rng: &mut ChaCha8Rng,
    placer: &mut Placer<'_, H>,
) -> (f32, bool) {
    let mut placed = 0.0;
    let mut steps = 0;
    while channel.cursor().needs_content(target) && steps < max_steps {
        steps += 1;
        let cells = channel.step(sets, rng, placer);
        placed += cells;
        if cells <= 0.0 && channel.is_idle() {
            return (placed, false);
        }
    }
    (placed, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    const CITY: &str = include_str!("../../../data/content/city.toml");

    fn generator(seed: u64) -> TrackGenerator {
        let library = ContentLibrary::load_toml_str(CITY).expect("city pack");
        TrackGenerator::new(library, GeneratorConfig::default(), TrackSeed::new(seed))
            .expect("valid generator")
    }

    #[test]
    fn test_rejects_library_without_themes() {
        let result = TrackGenerator::new(
            ContentLibrary::default(),
            GeneratorConfig::default(),
            TrackSeed::default(),
        );
        assert!(matches!(result, Err(GeneratorError::NoThemes)));
    }

    #[test]
    fn test_rejects_unaddressable_lanes() {
        let mut library = ContentLibrary::load_toml_str(CITY).unwrap();
        library.lane_count = MAX_LANE_COUNT + 1;
        assert!(matches!(
            TrackGenerator::new(library, GeneratorConfig::default(), TrackSeed::default()),
            Err(GeneratorError::TooManyLanes(257))
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let library = ContentLibrary::load_toml_str(CITY).unwrap();
        let config = GeneratorConfig {
            cell_depth: -1.0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            TrackGenerator::new(library, config, TrackSeed::default()),
            Err(GeneratorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_start_places_theme_begin_cap() {
        let mut generator = generator(1);
        let mut host = RecordingHost::new();
        generator.start(&mut host);
        generator.start(&mut host);

        assert_eq!(host.pieces.len(), 1);
        assert_eq!(host.pieces[0].kind, PieceKind::ThemeBegin);
        assert_eq!(host.pieces[0].handle, "downtown/gate_in");
        let state = generator.state();
        assert!((state.road().z() - 10.0).abs() < f32::EPSILON);
        assert!((state.left().z() - 10.0).abs() < f32::EPSILON);
        assert!((state.right().z() - 10.0).abs() < f32::EPSILON);
        assert_eq!(generator.stats().themes_started, 1);
    }

    #[test]
    fn test_first_advance_fills_build_ahead() {
        let mut generator = generator(2);
        let mut host = RecordingHost::new();
        generator.advance(0.0, 0.0, &mut host);

        let config = generator.config().clone();
        let state = generator.state();
        assert!(generator.is_started());
        assert!(state.road().z() >= config.road_build_ahead);
        assert!(state.left().z() >= config.side_build_ahead);
        assert!(state.right().z() >= config.side_build_ahead);
        assert!(generator.stats().boxes_selected > 0);
        assert_eq!(generator.stats().pieces_placed, host.pieces.len() as u64);
    }

    #[test]
    fn test_scroll_moves_every_cursor() {
        let mut generator = generator(3);
        let mut host = RecordingHost::new();
        generator.advance(0.0, 0.0, &mut host);
        let before = generator.state().road().z();

        // 4 world units = 1 cell, well within the build-ahead slack.
        let mut quiet = RecordingHost::new();
        generator.advance(4.0, 0.0, &mut quiet);
        let after = generator.state().road().z();

        assert!((generator.state().traveled_cells() - 1.0).abs() < 1e-6);
        if quiet.on_channel(Channel::Road).next().is_none() {
            assert!((before - after - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_restart_replays_the_same_track() {
        let mut generator = generator(4);
        let mut first = RecordingHost::new();
        for _ in 0..200 {
            generator.advance(8.0, 0.2, &mut first);
        }

        generator.restart();
        assert!(!generator.is_started());
        assert_eq!(generator.stats().ticks, 0);

        let mut second = RecordingHost::new();
        for _ in 0..200 {
            generator.advance(8.0, 0.2, &mut second);
        }
        assert_eq!(first.pieces, second.pieces);
        assert_eq!(first.boxes_placed, second.boxes_placed);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut generator = generator(5);
        let mut host = RecordingHost::new();
        generator.advance(0.0, 3.0, &mut host);
        assert!((generator.state().progress() - 1.0).abs() < f32::EPSILON);
        generator.advance(0.0, f32::NAN, &mut host);
        assert!((generator.state().progress() - 1.0).abs() < f32::EPSILON);
    }
}
