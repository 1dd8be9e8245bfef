//! # Segment Channels
//!
//! Road and side channels play one segment set at a time:
//!
//! ```text
//!          draw set            count reached / forced end
//!  Idle ──────────────> Begin ──> Body(n) ──────────────────> End ──> Idle
//!                       [cap]     [body]...                   [cap]
//! ```
//!
//! `Begin` and `End` are transient: they place their cap (if the set has
//! one) and move on within the same call.

use rand::Rng;
use runway_content::{SegmentSet, Side, Variant, WeightedGroup, CELL_SYNC_SIZE};

use crate::cursor::LaneCursor;
use crate::host::{Channel, PieceKind, Placer, SegmentPlacement, TrackHost};

/// The set currently playing on a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveSet {
    /// Index into the theme's road or side sets.
    pub set: usize,
    /// Bodies placed so far.
    pub placed: u32,
}

/// Observable channel state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelPhase {
    /// No set playing.
    Idle,
    /// Playing set bodies, with the number placed so far.
    Body(u32),
}

/// A Road or Side generation channel.
#[derive(Clone, Debug)]
pub struct SegmentChannel {
    channel: Channel,
    cursor: LaneCursor,
    active: Option<ActiveSet>,
}

impl SegmentChannel {
    /// Creates an idle channel with its cursor at `z`.
    #[must_use]
    pub const fn new(channel: Channel, z: f32) -> Self {
        Self {
            channel,
            cursor: LaneCursor::new(z),
            active: None,
        }
    }

    /// Which channel this is.
    #[inline]
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The channel cursor.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> LaneCursor {
        self.cursor
    }

    /// Mutable cursor access.
    #[inline]
    pub fn cursor_mut(&mut self) -> &mut LaneCursor {
        &mut self.cursor
    }

    /// Shorthand for `cursor().z()`.
    #[inline]
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.cursor.z()
    }

    /// The playing set, if any.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> Option<ActiveSet> {
        self.active
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ChannelPhase {
        self.active
            .map_or(ChannelPhase::Idle, |active| ChannelPhase::Body(active.placed))
    }

    /// Whether no set is playing.
    #[inline]
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// One generation request. Returns the cells placed.
    ///
    /// From `Idle` this draws and begins a set; when the set has no begin cap
    /// the first body is placed right away so the request always progresses.
    pub fn step<R, H>(
        &mut self,
        sets: &WeightedGroup<SegmentSet>,
        rng: &mut R,
        placer: &mut Placer<'_, H>,
    ) -> f32
    where
        R: Rng + ?Sized,
        H: TrackHost + ?Sized,
    {
        if self.active.is_some() {
            return self.place_body(sets, rng, placer);
        }

        let Some(set) = self.draw_set(sets, rng) else {
            return 0.0;
        };
        let begun = self.begin(set, sets, placer);
        if begun > 0.0 {
            begun
        } else {
            self.place_body(sets, rng, placer)
        }
    }

    /// Draws a set for this channel.
    ///
    /// Side channels fall back to set 0 when the drawn set belongs to the
    /// other side.
    pub fn draw_set<R: Rng + ?Sized>(
        &self,
        sets: &WeightedGroup<SegmentSet>,
        rng: &mut R,
    ) -> Option<usize> {
        let index = sets.get(rng)?;
        match self.channel.side() {
            Some(side) if !set_fits(sets, index, side) => Some(0),
            _ => Some(index),
        }
    }

    /// `Idle -> Begin -> Body(0)`: starts `set`, placing its begin cap.
    ///
    /// No-op unless idle. Returns the cells placed.
    pub fn begin<H: TrackHost + ?Sized>(
        &mut self,
        set: usize,
        sets: &WeightedGroup<SegmentSet>,
        placer: &mut Placer<'_, H>,
    ) -> f32 {
        if self.active.is_some() {
            return 0.0;
        }
        let Some(segment_set) = sets.item(set) else {
            return 0.0;
        };

        self.active = Some(ActiveSet { set, placed: 0 });
        segment_set
            .begin
            .as_ref()
            .map_or(0.0, |cap| self.place_piece(PieceKind::SetBegin, cap, placer))
    }

    /// `Body(n)`: places one body, ending the set once the count is reached.
    ///
    /// No-op when idle. Returns the cells placed.
    pub fn place_body<R, H>(
        &mut self,
        sets: &WeightedGroup<SegmentSet>,
        rng: &mut R,
        placer: &mut Placer<'_, H>,
    ) -> f32
    where
        R: Rng + ?Sized,
        H: TrackHost + ?Sized,
    {
        let Some(mut active) = self.active else {
            return 0.0;
        };
        let Some(segment_set) = sets.item(active.set) else {
            self.active = None;
            return 0.0;
        };

        if active.placed >= segment_set.body_place_count {
            return self.finish(segment_set, placer);
        }

        let Some(body) = segment_set.bodies.pick(rng) else {
            tracing::warn!(
                "Segment set '{}' has no bodies, dropping it from {:?}",
                segment_set.name,
                self.channel
            );
            self.active = None;
            return 0.0;
        };

        let mut cells = self.place_piece(PieceKind::Body, body, placer);
        active.placed += 1;
        self.active = Some(active);

        if active.placed >= segment_set.body_place_count {
            cells += self.finish(segment_set, placer);
        }
        cells
    }

    /// Jumps straight to `End` (placing the end cap) from any body count.
    ///
    /// No-op when idle. Returns the cells placed.
    pub fn force_end<H: TrackHost + ?Sized>(
        &mut self,
        sets: &WeightedGroup<SegmentSet>,
        placer: &mut Placer<'_, H>,
    ) -> f32 {
        let Some(active) = self.active else {
            return 0.0;
        };
        match sets.item(active.set) {
            Some(segment_set) => self.finish(segment_set, placer),
            None => {
                self.active = None;
                0.0
            }
        }
    }

    /// Places a piece at the cursor and advances by the host footprint.
    pub(crate) fn place_piece<H: TrackHost + ?Sized>(
        &mut self,
        kind: PieceKind,
        variant: &Variant,
        placer: &mut Placer<'_, H>,
    ) -> f32 {
        let placement = SegmentPlacement::new(self.channel, kind, variant, self.cursor.z())
            .with_mirror(self.channel == Channel::RightSide);
        let cells = placer.place(placement);
        self.cursor.advance(cells);
        cells
    }

    /// Places a sync filler and advances by exactly one quantum.
    pub(crate) fn place_filler<H: TrackHost + ?Sized>(
        &mut self,
        filler: &Variant,
        placer: &mut Placer<'_, H>,
    ) {
        let placement =
            SegmentPlacement::new(self.channel, PieceKind::SyncFiller, filler, self.cursor.z())
                .with_mirror(self.channel == Channel::RightSide);
        placer.place(placement);
        self.cursor.advance(CELL_SYNC_SIZE as f32);
    }

    fn finish<H: TrackHost + ?Sized>(
        &mut self,
        segment_set: &SegmentSet,
        placer: &mut Placer<'_, H>,
    ) -> f32 {
        self.active = None;
        segment_set
            .end
            .as_ref()
            .map_or(0.0, |cap| self.place_piece(PieceKind::SetEnd, cap, placer))
    }
}

fn set_fits(sets: &WeightedGroup<SegmentSet>, index: usize, side: Side) -> bool {
    sets.item(index)
        .is_some_and(|set| set.affinity.matches(side))
}
