//! Shared event contracts for in-process broadcast.
//!
//! This crate defines the formal contracts (DTOs) for events that flow
//! between the updates service and same-process observers (e.g. a foreground
//! screen). Using shared types prevents runtime deserialization errors from
//! mismatched field names.
//!
//! Also provides the `EventBus` trait and the `LocalEventBus`
//! publish/subscribe implementation.

mod bus;

pub use bus::{
    EventBus, EventBusRef, InMemoryEventBus, LocalEventBus, NullEventBus, PublishedEvent,
    Subscriber,
};

use serde::{Deserialize, Serialize};

/// Event published for every new location fix.
///
/// Producers: updates service (provider callback)
/// Consumers: same-process observers (foreground screen, loggers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationBroadcastEvent {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Fix capture timestamp in milliseconds since epoch.
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Event published when the service flips foreground/background mode.
///
/// Producers: updates service (lifecycle controller)
/// Consumers: same-process observers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeChangedEvent {
    /// True when the service now runs foreground-visible.
    pub foreground: bool,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// New location fix broadcast.
    pub const LOCATION_UPDATE: &str = "location:update";
    /// Service mode change.
    pub const MODE_CHANGED: &str = "service:mode_changed";
}
