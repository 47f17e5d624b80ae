//! Data gateway for the GlobeTrotter dashboard
//!
//! Wraps the weather, exchange-rate and world-time providers behind one
//! interface with a time-boxed in-memory cache and a single failure
//! reporting channel.

pub mod cache;
pub mod fixtures;
pub mod gateway;
pub mod notifier;
pub mod sweep;
pub mod types;
pub mod world_time;

pub use cache::{Clock, ManualClock, ResponseCache, TokioClock};
pub use gateway::Gateway;
pub use notifier::{ChannelNotifier, Notifier, TracingNotifier};
pub use sweep::{spawn_sweeper, SweepHandle};
pub use types::*;
pub use world_time::LOCAL as LOCAL_TIMEZONE;
