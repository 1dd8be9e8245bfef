//! # Host Interface
//!
//! The generator only decides WHAT goes WHERE. Spawning, pooling and
//! rendering belong to the host, reached through [`TrackHost`].
//!
//! Positions are in cells ahead of the player at the moment of the call;
//! `absolute` is the same position measured from the start of the run.

use runway_content::{Side, Variant};

/// A generation channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Road surface.
    Road,
    /// Left border.
    LeftSide,
    /// Right border.
    RightSide,
    /// Obstacle lane, 0 = leftmost.
    Lane(u8),
}

impl Channel {
    /// The side this channel decorates, if it is a side channel.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::LeftSide => Some(Side::Left),
            Self::RightSide => Some(Side::Right),
            _ => None,
        }
    }
}

/// What role a placed piece plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// Full-width cap opening a theme.
    ThemeBegin,
    /// Full-width cap closing a theme.
    ThemeEnd,
    /// Begin cap of a segment set.
    SetBegin,
    /// Body of a segment set.
    Body,
    /// End cap of a segment set.
    SetEnd,
    /// One-quantum filler inserted by the sync coordinator.
    SyncFiller,
    /// Full-width begin cap of an override road.
    OverrideBegin,
    /// Full-width body of an override road.
    OverrideBody,
    /// Full-width end cap of an override road.
    OverrideEnd,
    /// Pattern obstacle.
    Obstacle,
}

/// A placement request.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentPlacement<'a> {
    /// Target channel.
    pub channel: Channel,
    /// Role of the piece.
    pub kind: PieceKind,
    /// The content to spawn.
    pub variant: &'a Variant,
    /// Cells ahead of the player.
    pub position: f32,
    /// Cells from the start of the run.
    pub absolute: f64,
    /// Mirror the piece across the track axis.
    pub mirrored: bool,
    /// Vertical offset (pattern super-boxes).
    pub y_offset: f32,
    /// Coin hint of the pattern element, untouched.
    pub coin_hint: Option<&'a str>,
}

impl<'a> SegmentPlacement<'a> {
    /// Creates an unmirrored request with no offset or hint.
    #[must_use]
    pub fn new(channel: Channel, kind: PieceKind, variant: &'a Variant, position: f32) -> Self {
        Self {
            channel,
            kind,
            variant,
            position,
            absolute: f64::from(position),
            mirrored: false,
            y_offset: 0.0,
            coin_hint: None,
        }
    }

    /// Sets the mirror flag.
    #[must_use]
    pub fn with_mirror(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Sets the vertical offset.
    #[must_use]
    pub fn with_y_offset(mut self, y_offset: f32) -> Self {
        self.y_offset = y_offset;
        self
    }

    /// Sets the coin hint.
    #[must_use]
    pub fn with_coin_hint(mut self, coin_hint: Option<&'a str>) -> Self {
        self.coin_hint = coin_hint;
        self
    }
}

/// Implemented by whatever turns placement decisions into world content.
pub trait TrackHost {
    /// Spawns a variant. Returns the footprint in cells.
    fn place_segment(&mut self, placement: &SegmentPlacement<'_>) -> u32;

    /// Reserves an invisible gap on a channel.
    fn place_empty(&mut self, channel: Channel, position: f32, cells_before: u32);

    /// A pattern box finished on every lane.
    fn notify_pattern_box_placed(&mut self) {}
}

impl<H: TrackHost + ?Sized> TrackHost for &mut H {
    fn place_segment(&mut self, placement: &SegmentPlacement<'_>) -> u32 {
        (**self).place_segment(placement)
    }

    fn place_empty(&mut self, channel: Channel, position: f32, cells_before: u32) {
        (**self).place_empty(channel, position, cells_before);
    }

    fn notify_pattern_box_placed(&mut self) {
        (**self).notify_pattern_box_placed();
    }
}

/// Forwards requests to a host, stamping the run origin onto positions.
///
/// Channels place through a `Placer` so every request of one tick shares
/// the same origin.
pub struct Placer<'h, H: TrackHost + ?Sized> {
    host: &'h mut H,
    origin: f64,
    placed: u64,
}

impl<'h, H: TrackHost + ?Sized> Placer<'h, H> {
    /// Wraps `host`; `origin` is the cells traveled since the run started.
    pub fn new(host: &'h mut H, origin: f64) -> Self {
        Self {
            host,
            origin,
            placed: 0,
        }
    }

    /// Places a piece and returns its footprint in cells.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn place(&mut self, mut placement: SegmentPlacement<'_>) -> f32 {
        placement.absolute = self.origin + f64::from(placement.position);
        self.placed += 1;
        self.host.place_segment(&placement) as f32
    }

    /// Pieces placed through this placer.
    #[must_use]
    pub const fn placed(&self) -> u64 {
        self.placed
    }

    pub(crate) fn empty(&mut self, channel: Channel, position: f32, cells_before: u32) {
        self.host.place_empty(channel, position, cells_before);
    }

    pub(crate) fn box_placed(&mut self) {
        self.host.notify_pattern_box_placed();
    }
}

/// A placement captured by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPiece {
    /// Target channel.
    pub channel: Channel,
    /// Role of the piece.
    pub kind: PieceKind,
    /// Variant handle.
    pub handle: String,
    /// Cells ahead of the player at placement time.
    pub position: f32,
    /// Cells from the start of the run.
    pub absolute: f64,
    /// Footprint returned to the generator.
    pub cells: u32,
    /// Mirror flag.
    pub mirrored: bool,
    /// Vertical offset.
    pub y_offset: f32,
    /// Coin hint.
    pub coin_hint: Option<String>,
}

/// A gap captured by [`RecordingHost`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGap {
    /// Target channel.
    pub channel: Channel,
    /// Cells ahead of the player at placement time.
    pub position: f32,
    /// Gap length.
    pub cells: u32,
}

/// A host that records every request and reports the authored footprint.
///
/// Used for headless simulation, tests and benchmarks.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    /// Every placed piece, in order.
    pub pieces: Vec<PlacedPiece>,
    /// Every requested gap, in order.
    pub gaps: Vec<PlacedGap>,
    /// Number of completed pattern boxes.
    pub boxes_placed: u32,
}

impl RecordingHost {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pieces placed on `channel`, in order.
    pub fn on_channel(&self, channel: Channel) -> impl Iterator<Item = &PlacedPiece> {
        self.pieces.iter().filter(move |piece| piece.channel == channel)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.pieces.clear();
        self.gaps.clear();
        self.boxes_placed = 0;
    }
}

impl TrackHost for RecordingHost {
    fn place_segment(&mut self, placement: &SegmentPlacement<'_>) -> u32 {
        self.pieces.push(PlacedPiece {
            channel: placement.channel,
            kind: placement.kind,
            handle: placement.variant.handle.clone(),
            position: placement.position,
            absolute: placement.absolute,
            cells: placement.variant.cells,
            mirrored: placement.mirrored,
            y_offset: placement.y_offset,
            coin_hint: placement.coin_hint.map(str::to_string),
        });
        placement.variant.cells
    }

    fn place_empty(&mut self, channel: Channel, position: f32, cells_before: u32) {
        self.gaps.push(PlacedGap {
            channel,
            position,
            cells: cells_before,
        });
    }

    fn notify_pattern_box_placed(&mut self) {
        self.boxes_placed += 1;
    }
}
