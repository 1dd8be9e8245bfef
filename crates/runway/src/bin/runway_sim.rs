//! # Runway Simulator
//!
//! Headless endless run: loads a content pack, drives the generator at a
//! fixed tick rate and prints what a spawner would have received.
//!
//! ## Usage
//!
//! ```bash
//! runway_sim --content data/content/city.toml --ticks 36000 --seed 42
//! ```

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::time::Instant;

use runway::{RunLoop, RunLoopConfig, RunwayResult, TrackEvent};
use runway_content::ContentLibrary;
use runway_procedural::TrackSeed;

struct Options {
    content: String,
    config: Option<String>,
    ticks: u64,
    runs: u32,
    seed: Option<u64>,
}

fn parse_args() -> Option<Options> {
    // Simple parsing, no external deps
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        content: "data/content/city.toml".to_string(),
        config: None,
        ticks: 36_000,
        runs: 1,
        seed: None,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--content" | "-c" => {
                if let Some(value) = value {
                    options.content.clone_from(value);
                    i += 1;
                }
            }
            "--config" | "-f" => {
                if let Some(value) = value {
                    options.config = Some(value.clone());
                    i += 1;
                }
            }
            "--ticks" | "-t" => {
                if let Some(value) = value {
                    options.ticks = value.parse().unwrap_or(36_000);
                    i += 1;
                }
            }
            "--runs" | "-r" => {
                if let Some(value) = value {
                    options.runs = value.parse().unwrap_or(1).max(1);
                    i += 1;
                }
            }
            "--seed" | "-s" => {
                if let Some(value) = value {
                    options.seed = value.parse().ok();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: runway_sim [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --content <PATH>   Content pack (default: data/content/city.toml)");
                println!("  -f, --config <PATH>    Run config TOML (default: built-in)");
                println!("  -t, --ticks <N>        Ticks per run (default: 36000)");
                println!("  -r, --runs <N>         Runs, each on a derived seed (default: 1)");
                println!("  -s, --seed <N>         Seed of the first run");
                println!("  -h, --help             Show this help");
                return None;
            }
            _ => {}
        }
        i += 1;
    }
    Some(options)
}

/// Per-run tally of what the spawner side received.
#[derive(Default)]
struct EventTally {
    pieces: BTreeMap<String, u64>,
    gaps: u64,
    boxes: u64,
    themes: Vec<String>,
}

impl EventTally {
    fn record(&mut self, events: Vec<TrackEvent>) {
        for event in events {
            match event {
                TrackEvent::SegmentPlaced { kind, .. } => {
                    *self.pieces.entry(format!("{kind:?}")).or_default() += 1;
                }
                TrackEvent::GapReserved { .. } => self.gaps += 1,
                TrackEvent::PatternBoxPlaced => self.boxes += 1,
                TrackEvent::ThemeChanged { theme, slot } => {
                    self.themes.push(format!("{slot}:{theme}"));
                }
                TrackEvent::RunRestarted { .. } => {}
            }
        }
    }

    fn print(&self) {
        println!("┌─ EVENTS ───────────────────────────────────────────────────────┐");
        for (kind, count) in &self.pieces {
            println!("│ {kind:<20}{count}");
        }
        println!("│ {:<20}{}", "Gaps", self.gaps);
        println!("│ {:<20}{}", "Boxes", self.boxes);
        println!("│ {:<20}{}", "Themes", self.themes.join(" → "));
        println!("└──────────────────────────────────────────────────────────────────┘");
    }
}

fn simulate(options: &Options) -> RunwayResult<()> {
    let mut config = match &options.config {
        Some(path) => RunLoopConfig::from_toml_path(path)?,
        None => RunLoopConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.seed = TrackSeed::new(seed);
    }

    let library = ContentLibrary::load_toml_path(&options.content)?;
    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Content:            {}", options.content);
    println!("│ Themes:             {}", library.themes.len());
    println!("│ Lanes:              {}", library.lane_count);
    println!("│ Tick Rate:          {} Hz", config.tick_rate);
    println!("│ Ticks / Run:        {}", options.ticks);
    println!("│ Seed:               {:#x}", config.seed.value());
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let mut run = RunLoop::new(library, config)?;
    let receiver = run.events();

    for run_index in 0..options.runs {
        if run_index > 0 {
            run.next_run();
        }
        let started = Instant::now();
        let mut tally = EventTally::default();
        for _ in 0..options.ticks {
            run.tick();
            tally.record(receiver.drain());
        }

        println!(
            "═══ RUN {} (seed {:#x}) in {:.2?} ═══",
            run_index + 1,
            run.generator().seed().value(),
            started.elapsed()
        );
        println!();
        run.stats().print_summary();
        println!();
        tally.print();

        let stats = run.generator().stats();
        println!();
        println!("┌─ GENERATOR ────────────────────────────────────────────────────┐");
        println!("│ Themes Started:     {}", stats.themes_started);
        println!("│ Sync Passes:        {} ({} fillers)", stats.sync_passes, stats.fillers_placed);
        println!("│ Patterns:           {}", stats.patterns_selected);
        println!("│ Super-Boxes:        {}", stats.super_boxes_entered);
        println!(
            "│ Boxes:              {} / {} completed",
            stats.boxes_completed, stats.boxes_selected
        );
        println!("│ Overrides:          {}", stats.overrides_started);
        println!("│ Stalled Steps:      {}", stats.stalled_steps);
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
    }
    Ok(())
}

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         RUNWAY SIMULATOR                                         ║");
    println!("║         ENDLESS TRACK, NO PLAYER                                 ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let Some(options) = parse_args() else {
        return ExitCode::SUCCESS;
    };
    match simulate(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
