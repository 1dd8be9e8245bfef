//! # RUNWAY
//!
//! Host integration for the endless track generator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │   RunLoop   │─────>│ TrackEvent  │─────>│  Spawner /  │
//! │ (Generator) │      │    Bus      │      │  Renderer   │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! The [`RunLoop`] ticks a [`TrackGenerator`](runway_procedural::TrackGenerator)
//! through a [`ChannelHost`], which turns every placement decision into a
//! [`TrackEvent`]. Consumers drain the bus at their own pace.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod events;
pub mod host;
pub mod run_loop;

pub use error::{RunwayError, RunwayResult};
pub use events::{EventBus, EventReceiver, EventSender, TrackEvent};
pub use host::ChannelHost;
pub use run_loop::{RunLoop, RunLoopConfig, TickStats, TickStatsAccumulator, TICK_BUDGET};
