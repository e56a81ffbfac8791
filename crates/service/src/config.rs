//! Process-wide immutable configuration for the updates service.

use waytrace_location::UpdatePolicy;

/// Identifier of the persistent notification posted while foreground.
pub const NOTIFICATION_ID: u32 = 5731;

/// Host API level at and above which notification channels are enforced.
/// Below this level channel creation is skipped entirely.
pub const CHANNEL_API_LEVEL: u32 = 26;

/// The name of the channel for notifications.
pub const DEFAULT_CHANNEL_ID: &str = "waytrace_channel_01";

/// Immutable service configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Notification channel id (version-gated by `api_level`).
    pub channel_id: String,

    /// Human-readable channel name shown in system settings.
    pub channel_name: String,

    /// Identifier under which the persistent notification is posted.
    pub notification_id: u32,

    /// Fixed notification title, derived from app identity.
    pub notification_title: String,

    /// Subscription policy handed to the location provider.
    pub policy: UpdatePolicy,

    /// API level of the hosting platform.
    pub api_level: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            channel_name: "Waytrace".to_string(),
            notification_id: NOTIFICATION_ID,
            notification_title: "Waytrace location updates".to_string(),
            policy: UpdatePolicy::default(),
            api_level: CHANNEL_API_LEVEL,
        }
    }
}

impl ServiceConfig {
    /// Whether the host platform requires channel-based notification grouping.
    pub fn channels_required(&self) -> bool {
        self.api_level >= CHANNEL_API_LEVEL
    }
}
