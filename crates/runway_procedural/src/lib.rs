//! # RUNWAY Procedural Generation
//!
//! Endless, lane-based track generation just ahead of a moving player.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed + same content + same inputs = same track
//! 2. **Cursor driven**: every channel tracks the next free cell ahead of the player
//! 3. **Aligned**: road and sides always rejoin on whole sync quanta
//! 4. **Decides, never spawns**: placement requests go to a [`TrackHost`]
//!
//! ## Core Components
//!
//! - `LaneCursor`: next free position of one channel
//! - `SegmentChannel`: BEGIN → BODY → END state machine for road and sides
//! - `PatternCursor`: pattern → super-box → box → element walk over the lanes
//! - `synchronize`: one-quantum fillers realigning road and sides
//! - `TrackGenerator`: the per-tick orchestrator
//!
//! ## Example
//!
//! ```rust,ignore
//! use runway_content::ContentLibrary;
//! use runway_procedural::{GeneratorConfig, RecordingHost, TrackGenerator, TrackSeed};
//!
//! let library = ContentLibrary::load_toml_path("data/content/city.toml")?;
//! let mut generator = TrackGenerator::new(library, GeneratorConfig::default(), TrackSeed::new(7))?;
//! let mut host = RecordingHost::new();
//!
//! // Player ran 12 world units this tick, 5% into the run
//! generator.advance(12.0, 0.05, &mut host);
//! assert!(generator.state().road().z() >= generator.config().road_build_ahead);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod channel;
pub mod config;
pub mod cursor;
pub mod error;
pub mod generator;
pub mod host;
pub mod pattern;
pub mod sync;

pub use channel::{ActiveSet, ChannelPhase, SegmentChannel};
pub use config::{GeneratorConfig, TrackSeed};
pub use cursor::LaneCursor;
pub use error::{GeneratorError, GeneratorResult};
pub use generator::{ActiveOverride, GeneratorState, GeneratorStats, TrackGenerator};
pub use host::{
    Channel, PieceKind, PlacedGap, PlacedPiece, Placer, RecordingHost, SegmentPlacement, TrackHost,
};
pub use pattern::{
    ActiveBox, ActivePattern, ActiveSuperBox, ApproachSerie, BoxStep, ElementStep, PatternCursor,
    SuperBoxStep,
};
pub use sync::{synchronize, whole_quanta, SyncReport};
