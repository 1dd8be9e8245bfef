//! # Track Event Bus
//!
//! Placement decisions leave the generator as [`TrackEvent`]s over a
//! bounded crossbeam channel. The generator side never blocks: when the bus
//! is full the event is dropped and the sender reports it.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use runway_procedural::{Channel, PieceKind};

/// Events published by the track host.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackEvent {
    // =========================================================================
    // Placement Events (Generator → Spawner)
    // =========================================================================
    /// A piece of content must be spawned.
    SegmentPlaced {
        /// Target channel.
        channel: Channel,
        /// Role of the piece.
        kind: PieceKind,
        /// Variant handle to spawn.
        handle: String,
        /// Cells ahead of the player.
        position: f32,
        /// Cells from the start of the run.
        absolute: f64,
        /// Footprint in cells.
        cells: u32,
        /// Mirror across the track axis.
        mirrored: bool,
        /// Vertical offset.
        y_offset: f32,
        /// Coin hint of the pattern element.
        coin_hint: Option<String>,
    },

    /// An invisible gap was reserved on a lane.
    GapReserved {
        /// Target channel.
        channel: Channel,
        /// Cells ahead of the player.
        position: f32,
        /// Gap length in cells.
        cells: u32,
    },

    /// A pattern box finished on every lane.
    PatternBoxPlaced,

    // =========================================================================
    // Run Events (RunLoop → UI)
    // =========================================================================
    /// A new theme started.
    ThemeChanged {
        /// Theme name.
        theme: String,
        /// Rotation slot.
        slot: usize,
    },

    /// The run was restarted.
    RunRestarted {
        /// Seed of the new run.
        seed: u64,
    },
}

/// Event bus for track events.
///
/// Pre-allocates a bounded channel so a stalled consumer cannot grow memory.
pub struct EventBus {
    sender: Sender<TrackEvent>,
    receiver: Receiver<TrackEvent>,
}

impl EventBus {
    /// Creates a new event bus holding at most `capacity` events in flight.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a sender/receiver pair.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Sender handle for track events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<TrackEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the bus is full or every receiver is gone.
    #[inline]
    pub fn send(&self, event: TrackEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Receiver handle for track events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<TrackEvent>,
}

impl EventReceiver {
    /// Takes every pending event.
    #[inline]
    pub fn drain(&self) -> Vec<TrackEvent> {
        let mut events = Vec::with_capacity(64);
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Takes one event if available.
    #[inline]
    pub fn try_recv(&self) -> Option<TrackEvent> {
        self.receiver.try_recv().ok()
    }

    /// Events waiting in the bus.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Whether any event is waiting.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_send_receive() {
        let (sender, receiver) = EventBus::create_pair(16);

        assert!(sender.send(TrackEvent::GapReserved {
            channel: Channel::Lane(1),
            position: 40.0,
            cells: 5,
        }));
        assert!(receiver.has_events());

        let received = receiver.try_recv().unwrap();
        if let TrackEvent::GapReserved { channel, cells, .. } = received {
            assert_eq!(channel, Channel::Lane(1));
            assert_eq!(cells, 5);
        } else {
            panic!("Wrong event type");
        }
    }

    #[test]
    fn test_event_drain() {
        let (sender, receiver) = EventBus::create_pair(100);

        for _ in 0..10 {
            let _ = sender.send(TrackEvent::PatternBoxPlaced);
        }

        let events = receiver.drain();
        assert_eq!(events.len(), 10);
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_bus_drops_instead_of_blocking() {
        let (sender, receiver) = EventBus::create_pair(2);

        assert!(sender.send(TrackEvent::PatternBoxPlaced));
        assert!(sender.send(TrackEvent::PatternBoxPlaced));
        assert!(!sender.send(TrackEvent::RunRestarted { seed: 1 }));
        assert_eq!(receiver.pending_count(), 2);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let bus = EventBus::new(4);
        let sender = bus.sender();
        drop(bus);

        assert!(!sender.send(TrackEvent::PatternBoxPlaced));
    }
}
