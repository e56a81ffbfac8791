//! The location updates service.
//!
//! Glue between the lifecycle state machine, the location provider, the
//! notifier and the event bus. Host lifecycle events arrive on the host's
//! sequencing thread and only flip state or enqueue work; provider fixes and
//! notification refreshes execute on the dedicated worker thread, which is
//! the single writer of the latest fix.

use crate::config::ServiceConfig;
use crate::host::Host;
use crate::lifecycle::{Lifecycle, Phase, ServiceMode, Transition};
use crate::notifier::{build_notification, ChannelSpec, Importance, Notifier};
use crate::worker::ServiceWorker;
use std::sync::{Arc, Mutex, Weak};
use waytrace_events::{event_names, EventBusRef, LocationBroadcastEvent, ModeChangedEvent};
use waytrace_location::{Location, LocationCallback, LocationProvider};
use waytrace_storage::SettingsStore;

/// Start signal delivered by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartCommand {
    /// Set when the start came from the notification's stop action.
    pub from_notification: bool,
}

impl StartCommand {
    /// Plain start, e.g. from `request_location_updates`.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Start triggered by the notification's "stop updates" action.
    pub fn from_notification() -> Self {
        Self {
            from_notification: true,
        }
    }
}

/// Restart policy reported back to the host from a start command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPolicy {
    /// Do not recreate the service after the process is killed.
    NotSticky,
}

/// The location updates service.
///
/// Construct with [`UpdatesService::new`], then drive it through the host
/// lifecycle surface (`on_create`, `on_bind`, `on_unbind`, ...) and the
/// poller surface (`request_location_updates`, `remove_location_updates`).
pub struct UpdatesService {
    config: ServiceConfig,
    provider: Arc<dyn LocationProvider>,
    notifier: Arc<dyn Notifier>,
    host: Arc<dyn Host>,
    bus: EventBusRef,
    settings: Arc<SettingsStore>,
    lifecycle: Mutex<Lifecycle>,
    /// The current location. Single value, overwritten on each fix.
    latest: Mutex<Option<Location>>,
    worker: Mutex<ServiceWorker>,
    weak_self: Weak<UpdatesService>,
}

impl UpdatesService {
    pub fn new(
        config: ServiceConfig,
        provider: Arc<dyn LocationProvider>,
        notifier: Arc<dyn Notifier>,
        host: Arc<dyn Host>,
        bus: EventBusRef,
        settings: Arc<SettingsStore>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            config,
            provider,
            notifier,
            host,
            bus,
            settings,
            lifecycle: Mutex::new(Lifecycle::new()),
            latest: Mutex::new(None),
            worker: Mutex::new(ServiceWorker::new()),
            weak_self: weak.clone(),
        })
    }

    // --- Host lifecycle surface ---

    /// Service creation: register the notification channel where the host
    /// platform enforces channels, and pre-seed the latest fix from the
    /// provider's cache on the worker.
    pub fn on_create(&self) {
        if self.config.channels_required() {
            self.notifier.create_channel(&ChannelSpec {
                id: self.config.channel_id.clone(),
                name: self.config.channel_name.clone(),
                importance: Importance::Default,
            });
        }

        let weak = self.weak_self.clone();
        self.worker
            .lock()
            .expect("worker mutex poisoned")
            .execute(move || {
                if let Some(service) = weak.upgrade() {
                    service.seed_last_known();
                }
            });
        tracing::info!("service created");
    }

    /// A client came to the foreground and bound. Foreground presentation
    /// stops; the caller gets a same-process handle (no IPC involved).
    pub fn on_bind(&self) -> ServiceHandle {
        tracing::info!("client bound");
        let transition = self
            .lifecycle
            .lock()
            .expect("lifecycle mutex poisoned")
            .on_bind();
        self.apply_bind_transition(transition);
        ServiceHandle {
            service: self
                .weak_self
                .upgrade()
                .expect("service dropped while handling bind"),
        }
    }

    /// A client returned and bound again. Symmetric with [`on_bind`].
    ///
    /// [`on_bind`]: UpdatesService::on_bind
    pub fn on_rebind(&self) {
        tracing::info!("client rebound");
        let transition = self
            .lifecycle
            .lock()
            .expect("lifecycle mutex poisoned")
            .on_rebind();
        self.apply_bind_transition(transition);
    }

    /// The last client unbound. Unless this is a transient configuration
    /// change, and updates are requested, the service goes foreground.
    ///
    /// Always returns `true` so the host redelivers [`on_rebind`] instead of
    /// requiring a fresh bind.
    ///
    /// [`on_rebind`]: UpdatesService::on_rebind
    pub fn on_unbind(&self) -> bool {
        tracing::info!("last client unbound");
        let requesting = self.requesting_updates();
        let transition = self
            .lifecycle
            .lock()
            .expect("lifecycle mutex poisoned")
            .on_unbind(requesting);

        if transition == Transition::PromoteForeground {
            tracing::info!("starting foreground presentation");
            let record = build_notification(
                &self.config,
                self.latest.lock().expect("latest mutex poisoned").as_ref(),
            );
            self.host
                .promote_foreground(self.config.notification_id, &record);
            self.publish_mode(true);
        }
        true
    }

    /// The host signalled a device configuration change (e.g. rotation).
    pub fn on_configuration_changed(&self) {
        self.lifecycle
            .lock()
            .expect("lifecycle mutex poisoned")
            .on_configuration_changed();
    }

    /// A start signal arrived.
    pub fn on_start_command(&self, command: StartCommand) -> StartPolicy {
        tracing::info!(from_notification = command.from_notification, "service started");
        if command.from_notification {
            // The user asked via the notification action to stop updates.
            // Exactly one remove and one self-stop, whatever the current
            // request state: remove stops on success, we stop otherwise.
            let stop_requested = self.remove_location_updates();
            if !stop_requested {
                self.host.stop_service();
            }
        }
        StartPolicy::NotSticky
    }

    /// The host is tearing the service down: drop all pending worker jobs.
    pub fn on_destroy(&self) {
        self.lifecycle
            .lock()
            .expect("lifecycle mutex poisoned")
            .on_destroy();
        self.worker.lock().expect("worker mutex poisoned").shutdown();
        tracing::info!("service destroyed");
    }

    // --- Poller surface ---

    /// Start periodic location updates.
    ///
    /// Persists the request flag, starts the service independently of any
    /// bound client, then subscribes to the provider. A permission failure
    /// is logged and rolls the flag back; it never propagates.
    pub fn request_location_updates(&self) {
        tracing::info!("requesting location updates");
        self.persist_requesting(true);
        self.host.start_service();

        let weak = self.weak_self.clone();
        let callback: LocationCallback = Arc::new(move |fix| {
            if let Some(service) = weak.upgrade() {
                service.dispatch_fix(fix);
            }
        });

        if let Err(e) = self.provider.request_updates(&self.config.policy, callback) {
            self.persist_requesting(false);
            tracing::error!(error = %e, "lost location permission, could not request updates");
        }
    }

    /// Stop periodic location updates and request self-stop.
    ///
    /// Returns `true` when a self-stop was requested. A permission failure
    /// is logged and rolls the flag back to `true` (the subscription is
    /// still live on the provider side); it never propagates.
    pub fn remove_location_updates(&self) -> bool {
        tracing::info!("removing location updates");
        match self.provider.remove_updates() {
            Ok(()) => {
                self.persist_requesting(false);
                self.host.stop_service();
                true
            }
            Err(e) => {
                self.persist_requesting(true);
                tracing::error!(error = %e, "lost location permission, could not remove updates");
                false
            }
        }
    }

    // --- Accessors ---

    /// Most recent fix observed, if any.
    pub fn latest_location(&self) -> Option<Location> {
        *self.latest.lock().expect("latest mutex poisoned")
    }

    /// Current operating mode derived from the lifecycle phase.
    pub fn mode(&self) -> ServiceMode {
        self.lifecycle
            .lock()
            .expect("lifecycle mutex poisoned")
            .mode()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lifecycle
            .lock()
            .expect("lifecycle mutex poisoned")
            .phase()
    }

    /// Whether the host currently flags this service as foreground.
    /// Consulted defensively before pushing a notification update.
    pub fn service_is_running_in_foreground(&self) -> bool {
        self.host.is_foreground()
    }

    // --- Internals ---

    fn apply_bind_transition(&self, transition: Transition) {
        debug_assert_eq!(transition, Transition::EnterBackground);
        let was_foreground = self.host.is_foreground();
        self.host.demote_foreground();
        self.notifier.cancel(self.config.notification_id);
        if was_foreground {
            self.publish_mode(false);
        }
    }

    fn requesting_updates(&self) -> bool {
        self.settings.is_requesting_updates().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read requesting flag");
            false
        })
    }

    fn persist_requesting(&self, requesting: bool) {
        if let Err(e) = self.settings.set_requesting_updates(requesting) {
            tracing::error!(error = %e, requesting, "failed to persist requesting flag");
        }
    }

    /// Best-effort pre-seed of the latest fix. Runs on the worker.
    fn seed_last_known(&self) {
        match self.provider.last_known() {
            Ok(Some(fix)) => {
                let mut latest = self.latest.lock().expect("latest mutex poisoned");
                // Never clobber a fix a periodic callback already delivered.
                if latest.is_none() {
                    tracing::debug!(location = %fix, "pre-seeded from cached fix");
                    *latest = Some(fix);
                }
            }
            Ok(None) => tracing::debug!("no cached fix available"),
            Err(e) => tracing::warn!(error = %e, "failed to get cached location"),
        }
    }

    /// Provider callback entry: hop onto the worker thread.
    fn dispatch_fix(&self, fix: Location) {
        let weak = self.weak_self.clone();
        let accepted = self
            .worker
            .lock()
            .expect("worker mutex poisoned")
            .execute(move || {
                if let Some(service) = weak.upgrade() {
                    service.handle_new_location(fix);
                }
            });
        if !accepted {
            tracing::debug!("worker unavailable, dropping fix");
        }
    }

    /// Runs on the worker: record the fix, broadcast it, refresh the
    /// notification while foreground.
    fn handle_new_location(&self, fix: Location) {
        tracing::info!(location = %fix, "new location");
        *self.latest.lock().expect("latest mutex poisoned") = Some(fix);

        let event = LocationBroadcastEvent {
            latitude: fix.latitude,
            longitude: fix.longitude,
            timestamp_ms: fix.timestamp_ms,
        };
        let payload = serde_json::to_value(&event).unwrap_or(serde_json::Value::Null);
        self.bus.publish(event_names::LOCATION_UPDATE, payload);

        if self.service_is_running_in_foreground() {
            let record = build_notification(&self.config, Some(&fix));
            self.notifier.post(self.config.notification_id, &record);
        }
    }

    fn publish_mode(&self, foreground: bool) {
        let event = ModeChangedEvent {
            foreground,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        };
        let payload = serde_json::to_value(&event).unwrap_or(serde_json::Value::Null);
        self.bus.publish(event_names::MODE_CHANGED, payload);
    }
}

/// Same-process handle returned from [`UpdatesService::on_bind`].
///
/// Both sides run in one process, so this is a plain reference with no
/// serialization involved.
#[derive(Clone)]
pub struct ServiceHandle {
    service: Arc<UpdatesService>,
}

impl ServiceHandle {
    /// Direct access to the service.
    pub fn service(&self) -> Arc<UpdatesService> {
        Arc::clone(&self.service)
    }

    pub fn request_location_updates(&self) {
        self.service.request_location_updates();
    }

    pub fn remove_location_updates(&self) {
        self.service.remove_location_updates();
    }

    pub fn latest_location(&self) -> Option<Location> {
        self.service.latest_location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::notifier::InMemoryNotifier;
    use waytrace_events::InMemoryEventBus;
    use waytrace_location::ManualProvider;
    use waytrace_storage::SettingsStore;

    fn make_service() -> Arc<UpdatesService> {
        UpdatesService::new(
            ServiceConfig::default(),
            Arc::new(ManualProvider::new()),
            Arc::new(InMemoryNotifier::new()),
            Arc::new(RecordingHost::new()),
            Arc::new(InMemoryEventBus::new()),
            Arc::new(SettingsStore::open_in_memory().unwrap()),
        )
    }

    #[test]
    fn test_start_command_policy_not_sticky() {
        let service = make_service();
        assert_eq!(
            service.on_start_command(StartCommand::plain()),
            StartPolicy::NotSticky
        );
    }

    #[test]
    fn test_handle_gives_direct_service_access() {
        let service = make_service();
        let handle = service.on_bind();
        assert!(Arc::ptr_eq(&handle.service(), &service));
    }

    #[test]
    fn test_initial_state() {
        let service = make_service();
        assert_eq!(service.phase(), Phase::Created);
        assert!(service.latest_location().is_none());
        assert!(!service.service_is_running_in_foreground());
    }
}
