//! Notification seam and record building.
//!
//! `NotificationRecord` is always recomputed on demand from the latest fix
//! and the service config; it is never stored independently of whatever
//! notification manager the `Notifier` implementation fronts.

use crate::config::ServiceConfig;
use std::sync::Mutex;
use waytrace_location::{location_text, Location};

/// Actions embedded in the persistent notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Open the host application.
    LaunchApp,
    /// Re-enter the service start path with the stop flag set.
    StopUpdates,
}

/// Importance tier for a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Low,
    Default,
    High,
}

/// Channel grouping/importance metadata, created once at service creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub id: String,
    pub name: String,
    pub importance: Importance,
}

/// Content of the persistent notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub title: String,
    pub body: String,
    /// Mirrors the body, shown transiently when the notification lands.
    pub ticker: String,
    /// Cannot be dismissed while the service is foreground.
    pub ongoing: bool,
    pub high_priority: bool,
    pub actions: Vec<NotificationAction>,
    /// Present only at/above the channel-enforcing API level.
    pub channel_id: Option<String>,
    /// Wall-clock timestamp shown on the notification.
    pub when_ms: i64,
}

/// Build the notification for the current state.
pub fn build_notification(
    config: &ServiceConfig,
    location: Option<&Location>,
) -> NotificationRecord {
    let text = location_text(location);
    NotificationRecord {
        title: config.notification_title.clone(),
        body: text.clone(),
        ticker: text,
        ongoing: true,
        high_priority: true,
        actions: vec![NotificationAction::LaunchApp, NotificationAction::StopUpdates],
        channel_id: config
            .channels_required()
            .then(|| config.channel_id.clone()),
        when_ms: chrono::Utc::now().timestamp_millis(),
    }
}

/// Seam over the system notification manager.
pub trait Notifier: Send + Sync {
    /// Create a notification channel. Idempotent; callers gate on the host
    /// API level before invoking.
    fn create_channel(&self, channel: &ChannelSpec);

    /// Post or update the notification under the given id.
    fn post(&self, id: u32, record: &NotificationRecord);

    /// Remove the notification under the given id.
    fn cancel(&self, id: u32);
}

/// In-memory notifier for testing.
///
/// Captures channels, posts and cancels for later inspection.
#[derive(Default)]
pub struct InMemoryNotifier {
    channels: Mutex<Vec<ChannelSpec>>,
    posts: Mutex<Vec<(u32, NotificationRecord)>>,
    cancels: Mutex<Vec<u32>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channels(&self) -> Vec<ChannelSpec> {
        self.channels.lock().expect("channel log poisoned").clone()
    }

    pub fn posts(&self) -> Vec<(u32, NotificationRecord)> {
        self.posts.lock().expect("post log poisoned").clone()
    }

    /// Most recent post under any id.
    pub fn last_post(&self) -> Option<(u32, NotificationRecord)> {
        self.posts.lock().expect("post log poisoned").last().cloned()
    }

    pub fn cancels(&self) -> Vec<u32> {
        self.cancels.lock().expect("cancel log poisoned").clone()
    }

    /// Whether a notification with the id is currently showing.
    ///
    /// The service cancels at most once per demotion, so comparing counts
    /// is sufficient: alive iff more posts than cancels were recorded.
    pub fn is_active(&self, id: u32) -> bool {
        let posts = self.posts.lock().expect("post log poisoned");
        let cancels = self.cancels.lock().expect("cancel log poisoned");
        let post_count = posts.iter().filter(|(post_id, _)| *post_id == id).count();
        let cancel_count = cancels.iter().filter(|c| **c == id).count();
        post_count > cancel_count
    }
}

impl Notifier for InMemoryNotifier {
    fn create_channel(&self, channel: &ChannelSpec) {
        let mut channels = self.channels.lock().expect("channel log poisoned");
        if channels.iter().any(|c| c.id == channel.id) {
            return;
        }
        channels.push(channel.clone());
    }

    fn post(&self, id: u32, record: &NotificationRecord) {
        tracing::debug!(id, body = %record.body, "notification posted");
        self.posts
            .lock()
            .expect("post log poisoned")
            .push((id, record.clone()));
    }

    fn cancel(&self, id: u32) {
        self.cancels.lock().expect("cancel log poisoned").push(id);
    }
}

/// No-op notifier for headless runs.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn create_channel(&self, _channel: &ChannelSpec) {}
    fn post(&self, _id: u32, _record: &NotificationRecord) {}
    fn cancel(&self, _id: u32) {}
}
