//! # Endless Run Integration Test
//!
//! Proves the track keeps up with the player forever: the road never has a
//! hole, sides and road stay aligned, themes rotate and patterns complete.

use runway_content::{ContentLibrary, CELL_SYNC_SIZE};
use runway_procedural::{
    Channel, GeneratorConfig, PieceKind, PlacedPiece, RecordingHost, TrackGenerator, TrackSeed,
};

const CITY: &str = include_str!("../../../data/content/city.toml");

/// Tolerance on absolute positions accumulated over thousands of ticks.
const POSITION_EPSILON: f64 = 0.05;

fn city_generator(seed: u64) -> TrackGenerator {
    let library = ContentLibrary::load_toml_str(CITY).expect("city pack must load");
    TrackGenerator::new(library, GeneratorConfig::default(), TrackSeed::new(seed))
        .expect("generator must build")
}

/// Runs `ticks` ticks at a speed that ramps from 6 to 14 world units per tick.
fn run(generator: &mut TrackGenerator, host: &mut RecordingHost, ticks: u32) {
    for tick in 0..ticks {
        let progress = tick as f32 / ticks as f32;
        let distance = 6.0 + 8.0 * progress;
        generator.advance(distance, progress, host);

        let config = generator.config();
        let state = generator.state();
        assert!(
            state.road().z() >= config.road_build_ahead,
            "road fell behind at tick {tick}: z={}",
            state.road().z()
        );
        assert!(state.left().z() >= config.side_build_ahead);
        assert!(state.right().z() >= config.side_build_ahead);
    }
}

fn road_pieces(host: &RecordingHost) -> Vec<&PlacedPiece> {
    host.on_channel(Channel::Road).collect()
}

/// Test: The road is one contiguous strip, piece after piece.
#[test]
fn test_road_is_contiguous() {
    let mut generator = city_generator(42);
    let mut host = RecordingHost::new();
    run(&mut generator, &mut host, 3_000);

    let road = road_pieces(&host);
    assert!(road.len() > 100);
    for pair in road.windows(2) {
        let expected = pair[0].absolute + f64::from(pair[0].cells);
        assert!(
            (pair[1].absolute - expected).abs() < POSITION_EPSILON,
            "gap/overlap between '{}' at {:.2} and '{}' at {:.2}",
            pair[0].handle,
            pair[0].absolute,
            pair[1].handle,
            pair[1].absolute
        );
    }
    println!("Road pieces: {}", road.len());
    println!("Traveled cells: {:.0}", generator.state().traveled_cells());
}

/// Test: Themes rotate through the rotation in order.
#[test]
fn test_themes_rotate() {
    let mut generator = city_generator(7);
    let mut host = RecordingHost::new();
    run(&mut generator, &mut host, 3_000);

    let begins: Vec<_> = host
        .pieces
        .iter()
        .filter(|piece| piece.kind == PieceKind::ThemeBegin)
        .map(|piece| piece.handle.as_str())
        .collect();
    assert!(begins.len() >= 3, "only {} themes started", begins.len());
    for (slot, handle) in begins.iter().enumerate() {
        let expected = if slot % 2 == 0 {
            "downtown/gate_in"
        } else {
            "harbor/arch_in"
        };
        assert_eq!(*handle, expected);
    }
    assert_eq!(generator.stats().themes_started, begins.len() as u64);

    // Every theme change went through a sync pass.
    assert!(generator.stats().sync_passes >= begins.len() as u64 - 1);
}

/// Test: Pattern boxes complete and are reported exactly once each.
#[test]
fn test_pattern_boxes_complete() {
    let mut generator = city_generator(1234);
    let mut host = RecordingHost::new();
    run(&mut generator, &mut host, 2_000);

    let stats = *generator.stats();
    assert!(stats.patterns_selected > 0);
    assert!(stats.boxes_completed > 10);
    assert_eq!(u64::from(host.boxes_placed), stats.boxes_completed);
    assert!(stats.boxes_completed <= stats.boxes_selected);
    assert_eq!(stats.stalled_steps, 0);

    let obstacles = host
        .pieces
        .iter()
        .filter(|piece| piece.kind == PieceKind::Obstacle)
        .count();
    assert!(obstacles > 0);
    assert!(host
        .pieces
        .iter()
        .filter(|piece| piece.kind == PieceKind::Obstacle)
        .all(|piece| matches!(piece.channel, Channel::Lane(lane) if lane < 3)));
}

/// Test: While an override road runs, no base road or side piece is placed.
#[test]
fn test_override_is_exclusive() {
    let mut seen_override = false;

    for seed in 0..8 {
        let mut generator = city_generator(seed);
        let mut host = RecordingHost::new();
        run(&mut generator, &mut host, 2_000);

        let mut span_start = None;
        for piece in &host.pieces {
            match (piece.kind, span_start) {
                (PieceKind::OverrideBegin, None) => {
                    span_start = Some(piece.absolute + f64::from(piece.cells));
                    seen_override = true;
                }
                (PieceKind::OverrideEnd, Some(_)) => span_start = None,
                (PieceKind::OverrideBody | PieceKind::Obstacle, _) => {}
                (kind, Some(start)) => {
                    assert!(
                        !(piece.channel == Channel::Road
                            || piece.absolute + POSITION_EPSILON >= start),
                        "{kind:?} '{}' placed inside an override at {:.1}",
                        piece.handle,
                        piece.absolute
                    );
                }
                _ => {}
            }
        }
    }
    assert!(seen_override, "no seed produced an override road");
}

/// Test: Side pieces rejoin the road on every sync.
#[test]
fn test_sides_track_the_road_on_quanta() {
    let mut generator = city_generator(99);
    let mut host = RecordingHost::new();
    run(&mut generator, &mut host, 1_500);

    let fillers = host
        .pieces
        .iter()
        .filter(|piece| piece.kind == PieceKind::SyncFiller);
    for filler in fillers {
        assert_eq!(filler.cells, CELL_SYNC_SIZE);
    }
    assert_eq!(
        generator.stats().fillers_placed,
        host.pieces
            .iter()
            .filter(|piece| piece.kind == PieceKind::SyncFiller)
            .count() as u64
    );
}

/// Test: Same seed, same track; different seed, different track.
#[test]
fn test_determinism() {
    let mut a = city_generator(5);
    let mut b = city_generator(5);
    let mut c = city_generator(6);
    let (mut host_a, mut host_b, mut host_c) =
        (RecordingHost::new(), RecordingHost::new(), RecordingHost::new());

    run(&mut a, &mut host_a, 500);
    run(&mut b, &mut host_b, 500);
    run(&mut c, &mut host_c, 500);

    assert_eq!(host_a.pieces, host_b.pieces);
    assert_ne!(host_a.pieces, host_c.pieces);
}

/// One lane, short themes, and a single long obstacle that opens an
/// approach series: themes end while the series is still open.
const LONG_SERIE_PACK: &str = r#"
lane_count = 1

[[themes]]
name = "strip"
body_cells = 50
pattern_progress = [{ from = 0.0, group = 0 }]

[[themes.road_sets]]
name = "plain"
body_place_count = 2
bodies = [{ handle = "road/plain_5", cells = 5 }]

[[themes.side_sets]]
name = "curb"
body_place_count = 2
bodies = [{ handle = "side/curb_5", cells = 5 }]

[[obstacle_groups]]
name = "wall"
obstacles = [{ handle = "wall/long", cells = 200 }]

[[boxes]]
name = "wall_run"
lanes = [[{ content = 0, write_serie = true }]]

[[box_groups]]
name = "walls"
choices = [{ index = 0 }]

[[super_boxes]]
name = "walls"
boxes = [{ index = 0 }]

[[super_box_groups]]
name = "walls"
choices = [{ index = 0 }]

[[patterns]]
name = "walls"
super_boxes = [{ index = 0 }]

[[pattern_groups]]
name = "walls"
choices = [{ index = 0 }]
"#;

/// Test: A theme ending mid-series never lets the next obstacle overlap.
#[test]
fn test_theme_end_keeps_open_serie_length() {
    let library = ContentLibrary::load_toml_str(LONG_SERIE_PACK).expect("pack must load");
    let mut generator =
        TrackGenerator::new(library, GeneratorConfig::default(), TrackSeed::new(3))
            .expect("generator must build");
    let mut host = RecordingHost::new();

    for _ in 0..200 {
        generator.advance(40.0, 0.5, &mut host);
    }

    let walls = host.on_channel(Channel::Lane(0)).count();
    assert!(walls >= 5, "only {walls} walls placed");
    assert!(generator.stats().themes_started > 5);
    assert_lanes_never_overlap(&host, 1);
    println!("Walls: {walls}");
}

/// Test: Override roads that lag behind the lanes never pull the lanes back.
#[test]
fn test_override_never_rewinds_lanes() {
    let config = GeneratorConfig {
        max_steps_per_tick: 3,
        ..GeneratorConfig::default()
    };
    let mut overrides = 0;

    for seed in 0..8 {
        let library = ContentLibrary::load_toml_str(CITY).expect("city pack must load");
        let mut generator = TrackGenerator::new(library, config.clone(), TrackSeed::new(seed))
            .expect("generator must build");
        let mut host = RecordingHost::new();
        for _ in 0..3_000 {
            generator.advance(8.0, 0.8, &mut host);
        }

        overrides += generator.stats().overrides_started;
        assert_lanes_never_overlap(&host, 3);
    }
    assert!(overrides > 0, "no seed produced an override road");
}

/// Every obstacle starts at or after the end of the previous one on its lane.
fn assert_lanes_never_overlap(host: &RecordingHost, lane_count: u8) {
    for lane in 0..lane_count {
        let obstacles: Vec<&PlacedPiece> = host
            .on_channel(Channel::Lane(lane))
            .filter(|piece| piece.kind == PieceKind::Obstacle)
            .collect();
        for pair in obstacles.windows(2) {
            let previous_end = pair[0].absolute + f64::from(pair[0].cells);
            assert!(
                pair[1].absolute + POSITION_EPSILON >= previous_end,
                "lane {lane}: '{}' at {:.1} overlaps '{}' ending at {:.1}",
                pair[1].handle,
                pair[1].absolute,
                pair[0].handle,
                previous_end
            );
        }
    }
}
