//! # Channel Host
//!
//! A [`TrackHost`] that publishes every placement on the event bus. The
//! footprint returned to the generator is the authored one; spawners that
//! resize pieces must do it before the content is loaded.

use runway_procedural::{Channel, SegmentPlacement, TrackHost};

use crate::events::{EventSender, TrackEvent};

/// Publishes placements as [`TrackEvent`]s.
pub struct ChannelHost {
    sender: EventSender,
    published: u64,
    dropped: u64,
}

impl ChannelHost {
    /// Creates a host publishing on `sender`.
    #[must_use]
    pub const fn new(sender: EventSender) -> Self {
        Self {
            sender,
            published: 0,
            dropped: 0,
        }
    }

    /// Events delivered to the bus.
    #[must_use]
    pub const fn published(&self) -> u64 {
        self.published
    }

    /// Events lost to a full or disconnected bus.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Publishes a non-placement event through the same accounting.
    pub fn publish(&mut self, event: TrackEvent) {
        if self.sender.send(event) {
            self.published += 1;
        } else {
            self.dropped += 1;
            // Only the first loss and every thousandth after it
            if self.dropped % 1000 == 1 {
                tracing::warn!(
                    "Track event bus full, {} event(s) dropped so far",
                    self.dropped
                );
            }
        }
    }
}

impl TrackHost for ChannelHost {
    fn place_segment(&mut self, placement: &SegmentPlacement<'_>) -> u32 {
        let cells = placement.variant.cells;
        self.publish(TrackEvent::SegmentPlaced {
            channel: placement.channel,
            kind: placement.kind,
            handle: placement.variant.handle.clone(),
            position: placement.position,
            absolute: placement.absolute,
            cells,
            mirrored: placement.mirrored,
            y_offset: placement.y_offset,
            coin_hint: placement.coin_hint.map(str::to_string),
        });
        cells
    }

    fn place_empty(&mut self, channel: Channel, position: f32, cells_before: u32) {
        self.publish(TrackEvent::GapReserved {
            channel,
            position,
            cells: cells_before,
        });
    }

    fn notify_pattern_box_placed(&mut self) {
        self.publish(TrackEvent::PatternBoxPlaced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use runway_content::Variant;
    use runway_procedural::PieceKind;

    #[test]
    fn test_segment_becomes_event() {
        let (sender, receiver) = EventBus::create_pair(8);
        let mut host = ChannelHost::new(sender);
        let variant = Variant::new("downtown/block_a", 10);

        let placement = SegmentPlacement::new(Channel::RightSide, PieceKind::Body, &variant, 25.0)
            .with_mirror(true)
            .with_coin_hint(Some("arc"));
        assert_eq!(host.place_segment(&placement), 10);
        assert_eq!(host.published(), 1);

        let events = receiver.drain();
        assert_eq!(
            events,
            vec![TrackEvent::SegmentPlaced {
                channel: Channel::RightSide,
                kind: PieceKind::Body,
                handle: "downtown/block_a".to_string(),
                position: 25.0,
                absolute: 25.0,
                cells: 10,
                mirrored: true,
                y_offset: 0.0,
                coin_hint: Some("arc".to_string()),
            }]
        );
    }

    #[test]
    fn test_gap_and_box_notifications() {
        let (sender, receiver) = EventBus::create_pair(8);
        let mut host = ChannelHost::new(sender);

        host.place_empty(Channel::Lane(2), 60.0, 5);
        host.notify_pattern_box_placed();

        let events = receiver.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], TrackEvent::PatternBoxPlaced);
    }

    #[test]
    fn test_full_bus_still_reports_footprint() {
        let (sender, receiver) = EventBus::create_pair(1);
        let mut host = ChannelHost::new(sender);
        let variant = Variant::new("road/plain", 5);

        for i in 0..3u8 {
            let placement =
                SegmentPlacement::new(Channel::Road, PieceKind::Body, &variant, f32::from(i) * 5.0);
            assert_eq!(host.place_segment(&placement), 5);
        }

        assert_eq!(host.published(), 1);
        assert_eq!(host.dropped(), 2);
        assert_eq!(receiver.pending_count(), 1);
    }
}
