//! # Sync Coordinator
//!
//! Road and sides advance independently and drift apart. Because every body
//! is a whole number of quanta, any drift can be closed with one-quantum
//! fillers taken from the canonical sets of the active theme:
//!
//! ```text
//! 1. force-end Left and Right
//! 2. fill the side that is behind until both sides match
//! 3. force-end Road
//! 4. Road ahead  -> fill both sides
//!    Road behind -> fill Road
//! ```
//!
//! Afterwards Road, Left and Right sit at the same cursor and are all idle.

use runway_content::{Theme, Variant, CELL_SYNC_SIZE};

use crate::channel::SegmentChannel;
use crate::host::{Placer, TrackHost};

/// What a sync pass inserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Fillers placed on the left side.
    pub left_fillers: u32,
    /// Fillers placed on the right side.
    pub right_fillers: u32,
    /// Fillers placed on the road.
    pub road_fillers: u32,
}

impl SyncReport {
    /// Total fillers placed.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.left_fillers + self.right_fillers + self.road_fillers
    }
}

/// Number of whole quanta in `gap` cells, allowing `tolerance` of slack.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn whole_quanta(gap: f32, tolerance: f32) -> u32 {
    if gap <= 0.0 {
        return 0;
    }
    ((gap + tolerance) / CELL_SYNC_SIZE as f32).floor() as u32
}

/// Realigns Road, Left and Right.
pub fn synchronize<H: TrackHost + ?Sized>(
    road: &mut SegmentChannel,
    left: &mut SegmentChannel,
    right: &mut SegmentChannel,
    theme: &Theme,
    tolerance: f32,
    placer: &mut Placer<'_, H>,
) -> SyncReport {
    let mut report = SyncReport::default();
    let side_filler = theme.side_filler();

    left.force_end(&theme.side_sets, placer);
    right.force_end(&theme.side_sets, placer);

    if left.z() < right.z() {
        report.left_fillers = fill_to(left, right.z(), side_filler, tolerance, placer);
    } else if right.z() < left.z() {
        report.right_fillers = fill_to(right, left.z(), side_filler, tolerance, placer);
    }

    road.force_end(&theme.road_sets, placer);

    let sides = left.z();
    if road.z() > sides {
        let target = road.z();
        report.left_fillers += fill_to(left, target, side_filler, tolerance, placer);
        report.right_fillers += fill_to(right, target, side_filler, tolerance, placer);
    } else if road.z() < sides {
        report.road_fillers = fill_to(road, sides, theme.road_filler(), tolerance, placer);
    }

    if report.total() > 0 {
        tracing::debug!(
            "Sync at z={:.1}: {} left, {} right, {} road fillers",
            road.z(),
            report.left_fillers,
            report.right_fillers,
            report.road_fillers
        );
    }
    report
}

/// Places fillers on `channel` until it reaches `target`, then snaps to it.
fn fill_to<H: TrackHost + ?Sized>(
    channel: &mut SegmentChannel,
    target: f32,
    filler: Option<&Variant>,
    tolerance: f32,
    placer: &mut Placer<'_, H>,
) -> u32 {
    let quanta = whole_quanta(target - channel.z(), tolerance);
    let placed = match filler {
        Some(filler) if quanta > 0 => {
            for _ in 0..quanta {
                channel.place_filler(filler, placer);
            }
            quanta
        }
        Some(_) => 0,
        None => {
            tracing::warn!(
                "No sync filler for {:?}, snapping {:.1} cells",
                channel.channel(),
                target - channel.z()
            );
            0
        }
    };
    channel.cursor_mut().set(target);
    placed
}
