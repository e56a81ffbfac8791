//! Host process seam.
//!
//! Models the slice of the process manager the service talks back to:
//! independent start (so the process outlives a disconnecting client),
//! self-stop, and foreground elevation. `is_foreground` queries the host's
//! own view, consulted defensively before refreshing the notification.

use crate::notifier::NotificationRecord;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Surface of the hosting process manager.
pub trait Host: Send + Sync {
    /// Start the service independently of any bound client.
    fn start_service(&self);

    /// Request that the service be stopped.
    fn stop_service(&self);

    /// Elevate to foreground, presenting the given notification.
    fn promote_foreground(&self, id: u32, record: &NotificationRecord);

    /// Drop foreground elevation.
    fn demote_foreground(&self);

    /// Whether the host currently flags this service as foreground.
    fn is_foreground(&self) -> bool;
}

/// Recording host for tests and headless runs.
///
/// Tracks the foreground flag and counts every call.
#[derive(Default)]
pub struct RecordingHost {
    foreground: AtomicBool,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    promotions: Mutex<Vec<(u32, NotificationRecord)>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Every foreground promotion with the record presented at that moment.
    pub fn promotions(&self) -> Vec<(u32, NotificationRecord)> {
        self.promotions.lock().expect("promotion log poisoned").clone()
    }
}

impl Host for RecordingHost {
    fn start_service(&self) {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn stop_service(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn promote_foreground(&self, id: u32, record: &NotificationRecord) {
        tracing::debug!(id, "promoted to foreground");
        self.promotions
            .lock()
            .expect("promotion log poisoned")
            .push((id, record.clone()));
        self.foreground.store(true, Ordering::SeqCst);
    }

    fn demote_foreground(&self) {
        self.foreground.store(false, Ordering::SeqCst);
    }

    fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::notifier::build_notification;

    #[test]
    fn test_recording_host_foreground_flag() {
        let host = RecordingHost::new();
        assert!(!host.is_foreground());

        let record = build_notification(&ServiceConfig::default(), None);
        host.promote_foreground(1, &record);
        assert!(host.is_foreground());
        assert_eq!(host.promotions().len(), 1);

        host.demote_foreground();
        assert!(!host.is_foreground());
    }

    #[test]
    fn test_recording_host_counts_calls() {
        let host = RecordingHost::new();
        host.start_service();
        host.start_service();
        host.stop_service();
        assert_eq!(host.start_calls(), 2);
        assert_eq!(host.stop_calls(), 1);
    }
}
