//! Provider trait abstracting the platform position source.
//!
//! The service logic only ever talks to this trait, so it can be exercised
//! without any device API. Platform bindings live outside this crate.

use crate::fix::Location;
use crate::policy::UpdatePolicy;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Callback type invoked by a provider for each new fix.
pub type LocationCallback = Arc<dyn Fn(Location) + Send + Sync + 'static>;

/// Errors surfaced by a location provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The host revoked or never granted location permission.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider could not produce a fix.
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// A periodic position source.
///
/// At most one subscription is active per provider; a second
/// `request_updates` replaces the previous callback.
pub trait LocationProvider: Send + Sync {
    /// Register a periodic callback under the given policy.
    fn request_updates(
        &self,
        policy: &UpdatePolicy,
        callback: LocationCallback,
    ) -> Result<(), ProviderError>;

    /// Deregister the active callback, if any.
    fn remove_updates(&self) -> Result<(), ProviderError>;

    /// Best-effort cached last-known fix. `None` is a valid answer.
    fn last_known(&self) -> Result<Option<Location>, ProviderError>;
}

/// Null implementation: accepts subscriptions but never delivers a fix.
pub struct NullProvider;

impl LocationProvider for NullProvider {
    fn request_updates(
        &self,
        _policy: &UpdatePolicy,
        _callback: LocationCallback,
    ) -> Result<(), ProviderError> {
        Ok(())
    }

    fn remove_updates(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn last_known(&self) -> Result<Option<Location>, ProviderError> {
        Ok(None)
    }
}

/// Scriptable provider for tests and headless runs.
///
/// Fixes are delivered synchronously on the caller's thread via [`emit`].
/// Permission loss is simulated with [`deny_permission`].
///
/// [`emit`]: ManualProvider::emit
/// [`deny_permission`]: ManualProvider::deny_permission
#[derive(Default)]
pub struct ManualProvider {
    callback: Mutex<Option<LocationCallback>>,
    cached: Mutex<Option<Location>>,
    deny: AtomicBool,
    request_calls: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl ManualProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cached last-known fix.
    pub fn set_last_known(&self, fix: Location) {
        *self.cached.lock().expect("cached mutex poisoned") = Some(fix);
    }

    /// Simulate permission loss (or re-grant) for subsequent calls.
    pub fn deny_permission(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }

    /// Whether a callback is currently registered.
    pub fn has_subscriber(&self) -> bool {
        self.callback.lock().expect("callback mutex poisoned").is_some()
    }

    /// Number of `request_updates` calls observed (denied ones included).
    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    /// Number of `remove_updates` calls observed (denied ones included).
    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    /// Deliver a fix to the registered callback.
    ///
    /// Returns `false` if no subscription is active.
    pub fn emit(&self, fix: Location) -> bool {
        let callback = self
            .callback
            .lock()
            .expect("callback mutex poisoned")
            .clone();
        match callback {
            Some(cb) => {
                cb(fix);
                true
            }
            None => {
                tracing::debug!("no active subscription, dropping fix");
                false
            }
        }
    }
}

impl LocationProvider for ManualProvider {
    fn request_updates(
        &self,
        policy: &UpdatePolicy,
        callback: LocationCallback,
    ) -> Result<(), ProviderError> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        if self.deny.load(Ordering::SeqCst) {
            return Err(ProviderError::PermissionDenied);
        }
        tracing::debug!(
            interval_ms = policy.interval.as_millis() as u64,
            accuracy = %policy.accuracy,
            "subscription registered"
        );
        *self.callback.lock().expect("callback mutex poisoned") = Some(callback);
        Ok(())
    }

    fn remove_updates(&self) -> Result<(), ProviderError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.deny.load(Ordering::SeqCst) {
            return Err(ProviderError::PermissionDenied);
        }
        *self.callback.lock().expect("callback mutex poisoned") = None;
        Ok(())
    }

    fn last_known(&self) -> Result<Option<Location>, ProviderError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(ProviderError::PermissionDenied);
        }
        Ok(*self.cached.lock().expect("cached mutex poisoned"))
    }
}
