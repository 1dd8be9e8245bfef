//! # Run Loop
//!
//! Fixed-timestep driver around one [`TrackGenerator`]:
//!
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. SPEED RAMP                                                       │
//! │    └─ speed = start + (max - start) * min(distance / ramp, 1)       │
//! │                                                                     │
//! │ 2. GENERATE                                                         │
//! │    ├─ advance(speed / tick_rate, progress)                          │
//! │    └─ every placement → TrackEvent on the bus                       │
//! │                                                                     │
//! │ 3. ANNOUNCE                                                         │
//! │    └─ ThemeChanged when the rotation slot moved                     │
//! │                                                                     │
//! │ 4. RECORD                                                           │
//! │    └─ TickStats into the accumulator                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop does not sleep. Pacing belongs to whoever calls [`RunLoop::tick`].

use std::path::Path;
use std::time::{Duration, Instant};

use runway_content::ContentLibrary;
use runway_procedural::{GeneratorConfig, TrackGenerator, TrackSeed};
use serde::{Deserialize, Serialize};

use crate::error::{RunwayError, RunwayResult};
use crate::events::{EventBus, EventReceiver, TrackEvent};
use crate::host::ChannelHost;

/// Generation time allowed per tick before it counts as over budget.
pub const TICK_BUDGET: Duration = Duration::from_micros(1_000);

/// Run tuning, loaded from TOML or built in code.
///
/// ```toml
/// tick_rate = 60
/// start_speed = 40.0
/// seed = 42
///
/// [generator]
/// road_build_ahead = 200.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunLoopConfig {
    /// Ticks per second of simulated time.
    pub tick_rate: u32,
    /// Player speed at the start of a run, world units per second.
    pub start_speed: f32,
    /// Speed reached at the end of the ramp.
    pub max_speed: f32,
    /// World units over which the speed ramps up.
    pub ramp_distance: f32,
    /// World units that map to progress 1.0. The run continues past it.
    pub run_length: f32,
    /// Track event bus capacity.
    pub event_capacity: usize,
    /// Log ticks that exceed [`TICK_BUDGET`].
    pub enable_timing_logs: bool,
    /// Seed of the first run.
    pub seed: TrackSeed,
    /// Generator tuning.
    pub generator: GeneratorConfig,
}

impl Default for RunLoopConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            start_speed: 40.0,
            max_speed: 90.0,
            ramp_distance: 8_000.0,
            run_length: 20_000.0,
            event_capacity: 4096,
            enable_timing_logs: false,
            seed: TrackSeed::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl RunLoopConfig {
    /// Parses a config from TOML and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`RunwayError::Config`] for unparsable or out-of-range values
    /// and [`RunwayError::Generator`] for bad generator tuning.
    pub fn from_toml_str(text: &str) -> RunwayResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RunwayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`RunwayError::Io`] if the file cannot be read, otherwise as
    /// [`RunLoopConfig::from_toml_str`].
    pub fn from_toml_path(path: impl AsRef<Path>) -> RunwayResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns the first bad value found.
    pub fn validate(&self) -> RunwayResult<()> {
        if self.tick_rate == 0 {
            return Err(RunwayError::Config("tick_rate must be at least 1".to_string()));
        }
        let positive = [
            ("start_speed", self.start_speed),
            ("max_speed", self.max_speed),
            ("ramp_distance", self.ramp_distance),
            ("run_length", self.run_length),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(RunwayError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.max_speed < self.start_speed {
            return Err(RunwayError::Config(format!(
                "max_speed {} is below start_speed {}",
                self.max_speed, self.start_speed
            )));
        }
        if self.event_capacity == 0 {
            return Err(RunwayError::Config(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        self.generator.validate()?;
        Ok(())
    }
}

/// Timing and output of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    /// Tick number within the run.
    pub tick: u64,
    /// Generation time in microseconds.
    pub total_us: u64,
    /// Player speed this tick, world units per second.
    pub speed: f32,
    /// World units traveled this tick.
    pub distance: f32,
    /// Pieces placed this tick.
    pub pieces_placed: u64,
    /// Events delivered to the bus this tick.
    pub events_published: u64,
    /// Events dropped on a full bus this tick.
    pub events_dropped: u64,
}

/// Accumulator for tick statistics.
#[derive(Clone, Debug)]
pub struct TickStatsAccumulator {
    /// Total ticks recorded.
    pub ticks_recorded: u64,
    /// Sum of tick times.
    pub total_us_sum: u64,
    /// Min tick time.
    pub min_tick_us: u64,
    /// Max tick time.
    pub max_tick_us: u64,
    /// Ticks that exceeded [`TICK_BUDGET`].
    pub ticks_over_budget: u64,
    /// Pieces placed over all ticks.
    pub pieces_sum: u64,
    /// Busiest tick, in pieces.
    pub max_pieces: u64,
    /// Events dropped over all ticks.
    pub events_dropped: u64,
    /// World units traveled.
    pub distance_sum: f64,
}

impl TickStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ticks_recorded: 0,
            total_us_sum: 0,
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            ticks_over_budget: 0,
            pieces_sum: 0,
            max_pieces: 0,
            events_dropped: 0,
            distance_sum: 0.0,
        }
    }

    /// Records a tick's statistics.
    #[allow(clippy::cast_possible_truncation)]
    pub fn record(&mut self, stats: TickStats) {
        self.ticks_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.min_tick_us = self.min_tick_us.min(stats.total_us);
        self.max_tick_us = self.max_tick_us.max(stats.total_us);
        self.pieces_sum += stats.pieces_placed;
        self.max_pieces = self.max_pieces.max(stats.pieces_placed);
        self.events_dropped += stats.events_dropped;
        self.distance_sum += f64::from(stats.distance);

        if stats.total_us > TICK_BUDGET.as_micros() as u64 {
            self.ticks_over_budget += 1;
        }
    }

    /// Average tick time in microseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_tick_us(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        self.total_us_sum as f64 / self.ticks_recorded as f64
    }

    /// Average pieces placed per tick.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_pieces(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        self.pieces_sum as f64 / self.ticks_recorded as f64
    }

    /// Fraction of ticks over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        self.ticks_over_budget as f64 / self.ticks_recorded as f64
    }

    /// Prints a summary of the statistics.
    #[allow(clippy::cast_precision_loss)]
    pub fn print_summary(&self) {
        let min_us = if self.ticks_recorded == 0 { 0 } else { self.min_tick_us };
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    TICK STATISTICS SUMMARY                       ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ───────────────────────────────────────────────────────┐");
        println!("│ Ticks Recorded:     {}", self.ticks_recorded);
        println!("│ Average Tick:       {:.2} µs", self.avg_tick_us());
        println!("│ Min Tick:           {min_us} µs");
        println!("│ Max Tick:           {} µs", self.max_tick_us);
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ BUDGET ───────────────────────────────────────────────────────┐");
        println!("│ Target:             {} µs", TICK_BUDGET.as_micros());
        println!(
            "│ Over Budget:        {} ticks ({:.1}%)",
            self.ticks_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ OUTPUT ───────────────────────────────────────────────────────┐");
        println!("│ Distance:           {:.0} units", self.distance_sum);
        println!("│ Pieces Placed:      {}", self.pieces_sum);
        println!("│ Pieces / Tick:      {:.2} (max {})", self.avg_pieces(), self.max_pieces);
        println!("│ Events Dropped:     {}", self.events_dropped);
        println!("└──────────────────────────────────────────────────────────────────┘");
    }
}

impl Default for TickStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives one generator at a fixed tick rate.
pub struct RunLoop {
    generator: TrackGenerator,
    config: RunLoopConfig,
    bus: EventBus,
    host: ChannelHost,
    tick_count: u64,
    runs: u64,
    distance: f64,
    announced_slot: Option<usize>,
    stats: TickStatsAccumulator,
}

impl RunLoop {
    /// Creates a run loop over `library`.
    ///
    /// # Errors
    ///
    /// Fails on a bad config or a library the generator cannot start.
    pub fn new(library: ContentLibrary, config: RunLoopConfig) -> RunwayResult<Self> {
        config.validate()?;
        let generator = TrackGenerator::new(library, config.generator.clone(), config.seed)?;
        let bus = EventBus::new(config.event_capacity);
        let host = ChannelHost::new(bus.sender());

        Ok(Self {
            generator,
            config,
            bus,
            host,
            tick_count: 0,
            runs: 0,
            distance: 0.0,
            announced_slot: None,
            stats: TickStatsAccumulator::new(),
        })
    }

    /// A receiver on the track event bus.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.bus.receiver()
    }

    /// Current player speed, world units per second.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn speed(&self) -> f32 {
        let ramp = (self.distance / f64::from(self.config.ramp_distance)).min(1.0) as f32;
        self.config.start_speed + (self.config.max_speed - self.config.start_speed) * ramp
    }

    /// Normalized run progress.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn progress(&self) -> f32 {
        (self.distance / f64::from(self.config.run_length)).clamp(0.0, 1.0) as f32
    }

    /// Runs one tick.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn tick(&mut self) -> TickStats {
        let started = Instant::now();
        let speed = self.speed();
        let distance = speed / self.config.tick_rate as f32;
        self.distance += f64::from(distance);
        let progress = self.progress();

        let pieces_before = self.generator.stats().pieces_placed;
        let published_before = self.host.published();
        let dropped_before = self.host.dropped();

        self.generator.advance(distance, progress, &mut self.host);
        self.announce_theme();

        let stats = TickStats {
            tick: self.tick_count,
            total_us: started.elapsed().as_micros() as u64,
            speed,
            distance,
            pieces_placed: self.generator.stats().pieces_placed - pieces_before,
            events_published: self.host.published() - published_before,
            events_dropped: self.host.dropped() - dropped_before,
        };
        self.tick_count += 1;
        self.stats.record(stats);

        if self.config.enable_timing_logs && stats.total_us > TICK_BUDGET.as_micros() as u64 {
            tracing::warn!(
                "Tick {} exceeded budget: {}µs (target: {}µs), {} pieces",
                stats.tick,
                stats.total_us,
                TICK_BUDGET.as_micros(),
                stats.pieces_placed
            );
        }
        stats
    }

    /// Runs `ticks` ticks back to back.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Replays the current run from the start with the same seed.
    pub fn restart(&mut self) {
        self.generator.restart();
        self.reset_run();
    }

    /// Starts the next run on a seed derived from the first one.
    pub fn next_run(&mut self) {
        self.runs += 1;
        let seed = self.config.seed.derive(self.runs);
        self.generator.restart_with_seed(seed);
        self.reset_run();
    }

    /// Ticks run since the last restart.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// World units traveled since the last restart.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// The generator being driven.
    #[must_use]
    pub const fn generator(&self) -> &TrackGenerator {
        &self.generator
    }

    /// The host publishing placements.
    #[must_use]
    pub const fn host(&self) -> &ChannelHost {
        &self.host
    }

    /// Run tuning.
    #[must_use]
    pub const fn config(&self) -> &RunLoopConfig {
        &self.config
    }

    /// Tick statistics since the last restart.
    #[must_use]
    pub const fn stats(&self) -> &TickStatsAccumulator {
        &self.stats
    }

    fn reset_run(&mut self) {
        self.tick_count = 0;
        self.distance = 0.0;
        self.announced_slot = None;
        self.stats = TickStatsAccumulator::new();
        self.host.publish(TrackEvent::RunRestarted {
            seed: self.generator.seed().value(),
        });
    }

    /// Several theme changes inside one tick are announced once, as the last.
    fn announce_theme(&mut self) {
        let slot = self.generator.state().theme_slot();
        if self.announced_slot == Some(slot) {
            return;
        }
        self.announced_slot = Some(slot);

        let theme = self
            .generator
            .current_theme()
            .map_or_else(String::new, |theme| theme.name.clone());
        tracing::debug!("Announcing theme '{}' (slot {})", theme, slot);
        self.host.publish(TrackEvent::ThemeChanged { theme, slot });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_procedural::PieceKind;

    const CITY: &str = include_str!("../../../data/content/city.toml");

    fn city_loop(config: RunLoopConfig) -> RunLoop {
        let library = ContentLibrary::load_toml_str(CITY).unwrap();
        RunLoop::new(library, config).unwrap()
    }

    #[test]
    fn test_config_defaults_are_valid() {
        assert!(RunLoopConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_toml() {
        let config = RunLoopConfig::from_toml_str(
            r"
            tick_rate = 30
            seed = 42

            [generator]
            road_build_ahead = 200.0
            ",
        )
        .unwrap();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.seed, TrackSeed::new(42));
        assert!((config.generator.road_build_ahead - 200.0).abs() < f32::EPSILON);
        assert_eq!(config.event_capacity, 4096);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            RunLoopConfig::from_toml_str("tick_rate = 0"),
            Err(RunwayError::Config(_))
        ));
        assert!(matches!(
            RunLoopConfig::from_toml_str("start_speed = 50.0\nmax_speed = 10.0"),
            Err(RunwayError::Config(_))
        ));
        assert!(matches!(
            RunLoopConfig::from_toml_str("[generator]\ncell_depth = 0.0"),
            Err(RunwayError::Generator(_))
        ));
        assert!(matches!(
            RunLoopConfig::from_toml_str("tick_rate = \"fast\""),
            Err(RunwayError::Config(_))
        ));
    }

    #[test]
    fn test_speed_ramps_and_caps() {
        let mut run = city_loop(RunLoopConfig {
            ramp_distance: 100.0,
            ..Default::default()
        });
        let start = run.speed();
        assert!((start - 40.0).abs() < f32::EPSILON);

        run.run(600);
        assert!((run.speed() - 90.0).abs() < f32::EPSILON);
        assert!((run.progress() - run.distance() as f32 / 20_000.0).abs() < 1e-4);
    }

    #[test]
    fn test_first_tick_publishes_track_and_theme() {
        let mut run = city_loop(RunLoopConfig::default());
        let receiver = run.events();

        let stats = run.tick();
        assert_eq!(stats.tick, 0);
        assert!(stats.pieces_placed > 0);
        assert_eq!(stats.events_dropped, 0);

        let events = receiver.drain();
        assert!(matches!(
            events.first(),
            Some(TrackEvent::SegmentPlaced {
                kind: PieceKind::ThemeBegin,
                ..
            })
        ));
        assert!(events.contains(&TrackEvent::ThemeChanged {
            theme: "downtown".to_string(),
            slot: 0,
        }));
    }

    #[test]
    fn test_small_bus_drops_without_stalling() {
        let mut run = city_loop(RunLoopConfig {
            event_capacity: 4,
            ..Default::default()
        });
        let stats = run.tick();

        assert_eq!(stats.events_published, 4);
        assert!(stats.events_dropped > 0);
        assert!(run.generator().state().road().z() >= run.config().generator.road_build_ahead);
        assert_eq!(run.stats().events_dropped, stats.events_dropped);
    }

    #[test]
    fn test_restart_replays_and_next_run_differs() {
        let mut run = city_loop(RunLoopConfig::default());
        let receiver = run.events();

        run.run(50);
        let first = receiver.drain();

        run.restart();
        assert_eq!(run.tick_count(), 0);
        assert_eq!(
            receiver.try_recv(),
            Some(TrackEvent::RunRestarted {
                seed: RunLoopConfig::default().seed.value()
            })
        );
        run.run(50);
        assert_eq!(receiver.drain(), first);

        run.next_run();
        assert_ne!(run.generator().seed(), RunLoopConfig::default().seed);
        assert!(matches!(
            receiver.try_recv(),
            Some(TrackEvent::RunRestarted { .. })
        ));
        run.run(50);
        assert_ne!(receiver.drain(), first);
    }

    #[test]
    fn test_accumulator_math() {
        let mut acc = TickStatsAccumulator::new();
        assert!(acc.avg_tick_us().abs() < f64::EPSILON);

        acc.record(TickStats {
            total_us: 100,
            pieces_placed: 4,
            ..Default::default()
        });
        acc.record(TickStats {
            total_us: 2_000,
            pieces_placed: 0,
            ..Default::default()
        });

        assert_eq!(acc.ticks_recorded, 2);
        assert!((acc.avg_tick_us() - 1_050.0).abs() < f64::EPSILON);
        assert!((acc.avg_pieces() - 2.0).abs() < f64::EPSILON);
        assert_eq!(acc.min_tick_us, 100);
        assert_eq!(acc.max_pieces, 4);
        assert!((acc.over_budget_ratio() - 0.5).abs() < f64::EPSILON);
    }
}
