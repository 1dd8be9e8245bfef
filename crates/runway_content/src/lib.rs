//! # RUNWAY Content
//!
//! Authored content for the endless track generator.
//!
//! ## Design Principles
//!
//! 1. **Cells everywhere**: every length is a whole number of cells
//! 2. **Sync quantum**: every body length is a multiple of [`CELL_SYNC_SIZE`]
//! 3. **Arena + index**: cross references are indices, validated once at load
//! 4. **External configuration**: all content lives in TOML files
//!
//! ## Example
//!
//! ```rust,ignore
//! use runway_content::ContentLibrary;
//!
//! let library = ContentLibrary::load_toml_path("data/content/city.toml")?;
//! assert!(library.body_variants().all(|v| v.cells % runway_content::CELL_SYNC_SIZE == 0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod library;
pub mod pattern;
pub mod segment;
pub mod weighted;

pub use error::{ContentError, ContentIssue, ContentResult};
pub use library::ContentLibrary;
pub use pattern::{
    resolve_index, BoxReference, ObstacleGroup, ObstaclePattern, PatternBox, PatternElement,
    PatternSuperBox, RefGroup, SuperBoxReference,
};
pub use segment::{PatternProgressRef, SegmentSet, Side, SideAffinity, Theme, Variant};
pub use weighted::{Weighted, WeightedGroup, WeightedRef};

/// The sync quantum, in cells. Every body length is a multiple of it.
pub const CELL_SYNC_SIZE: u32 = 5;

/// Lane count used when the content does not declare one.
pub const DEFAULT_LANE_COUNT: usize = 3;

/// Most obstacle lanes a track can have. Lanes are addressed by a `u8`.
pub const MAX_LANE_COUNT: usize = 256;
