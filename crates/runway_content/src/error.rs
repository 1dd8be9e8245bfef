//! # Content Error Types
//!
//! Loading fails on I/O and parse errors. Authoring defects are collected
//! into a list of [`ContentIssue`]s so an author sees every problem at once.

use thiserror::Error;

/// Errors that can occur while loading content.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The content file could not be read.
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    /// The content file is not valid TOML for the content model.
    #[error("failed to parse content: {0}")]
    Parse(#[from] toml::de::Error),

    /// The content parsed but has authoring defects.
    #[error("content has {} issue(s), first: {}", .0.len(), first_issue(.0))]
    Invalid(Vec<ContentIssue>),
}

/// A single authoring defect found by validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentIssue {
    /// The library has no themes at all.
    #[error("library has no themes")]
    NoThemes,

    /// An index points past the end of its arena.
    #[error("{owner}: {what} index {index} out of range (len {len})")]
    DanglingIndex {
        /// Where the reference lives.
        owner: String,
        /// What kind of arena it points into.
        what: &'static str,
        /// The offending index.
        index: usize,
        /// Length of the arena.
        len: usize,
    },

    /// A weighted collection has no items.
    #[error("{owner}: {what} is empty")]
    EmptyGroup {
        /// Where the collection lives.
        owner: String,
        /// What kind of collection.
        what: &'static str,
    },

    /// A weighted collection has items but no positive weight.
    #[error("{owner}: {what} has no positive weight")]
    ZeroWeight {
        /// Where the collection lives.
        owner: String,
        /// What kind of collection.
        what: &'static str,
    },

    /// A segment variant is not a whole number of sync quanta.
    #[error("{owner}: variant '{handle}' is {cells} cells, not a multiple of {quantum}")]
    NotQuantum {
        /// Set that owns the variant.
        owner: String,
        /// Variant handle.
        handle: String,
        /// Authored length.
        cells: u32,
        /// The sync quantum.
        quantum: u32,
    },

    /// Side set 0 of a theme must be usable on both sides.
    #[error("theme '{theme}': side set 0 must have affinity Both")]
    MissingCanonicalSideSet {
        /// Theme name.
        theme: String,
    },

    /// The canonical filler of a theme is not exactly one quantum long.
    #[error("theme '{theme}': {channel} filler is {cells} cells, must be {quantum}")]
    BadFiller {
        /// Theme name.
        theme: String,
        /// "road" or "side".
        channel: &'static str,
        /// Authored length.
        cells: u32,
        /// The sync quantum.
        quantum: u32,
    },

    /// The track declares more lanes than can be addressed.
    #[error("track has {lanes} lanes, at most {max} are supported")]
    BadLaneCount {
        /// Authored lane count.
        lanes: usize,
        /// Largest supported lane count.
        max: usize,
    },

    /// A box declares more lanes than the track has.
    #[error("box '{name}': {lanes} lanes, track has {expected}")]
    TooManyLanes {
        /// Box name.
        name: String,
        /// Authored lane count.
        lanes: usize,
        /// Track lane count.
        expected: usize,
    },
}

fn first_issue(issues: &[ContentIssue]) -> String {
    issues
        .first()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;
