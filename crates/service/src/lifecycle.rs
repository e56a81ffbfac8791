//! Lifecycle state machine for the updates service.
//!
//! Pure domain logic - no I/O, no platform dependencies. Host callbacks
//! (bind/unbind/rebind/configuration-change/destroy) are folded into an
//! explicit state machine instead of scattered boolean checks, so the one
//! non-obvious rule lives in a single place: an unbind that immediately
//! follows a configuration change is a transient rotation, not a client
//! going away, and must not promote the service to foreground.

/// Host-visible lifecycle phase of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Service object exists, no client has bound yet.
    Created,
    /// At least one client is bound.
    Bound,
    /// The last client unbound.
    Unbound,
    /// The host destroyed the service.
    Destroyed,
}

/// Operating mode derived from the lifecycle phase.
///
/// Exactly one mode is active at any time; it changes only on
/// bind/unbind/rebind events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceMode {
    /// A client is bound; foreground presentation is suppressed.
    BoundBackground,
    /// No client is bound; the service presents itself via notification.
    UnboundForeground,
}

/// Effect the service must apply after a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to present.
    None,
    /// Drop foreground presentation (cancel the notification).
    EnterBackground,
    /// Post the notification and elevate the process.
    PromoteForeground,
}

/// The lifecycle controller state.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Phase,
    /// Set on a configuration-change notification, cleared on the next
    /// bind/rebind. Distinguishes rotation from a client really leaving.
    config_changing: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::Created,
            config_changing: false,
        }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current operating mode.
    pub fn mode(&self) -> ServiceMode {
        match self.phase {
            Phase::Bound => ServiceMode::BoundBackground,
            _ => ServiceMode::UnboundForeground,
        }
    }

    pub fn is_config_changing(&self) -> bool {
        self.config_changing
    }

    /// A client came to the foreground and bound.
    pub fn on_bind(&mut self) -> Transition {
        self.phase = Phase::Bound;
        self.config_changing = false;
        Transition::EnterBackground
    }

    /// A client returned and bound again. Symmetric with `on_bind`.
    pub fn on_rebind(&mut self) -> Transition {
        self.on_bind()
    }

    /// The last client unbound.
    ///
    /// Promotes to foreground only when this is a real departure (not a
    /// configuration change) and updates are currently requested.
    pub fn on_unbind(&mut self, requesting_updates: bool) -> Transition {
        let rotation = self.config_changing;
        self.phase = Phase::Unbound;
        if !rotation && requesting_updates {
            Transition::PromoteForeground
        } else {
            Transition::None
        }
    }

    /// The host signalled a device configuration change (e.g. rotation).
    pub fn on_configuration_changed(&mut self) {
        self.config_changing = true;
    }

    /// The host is tearing the service down.
    pub fn on_destroy(&mut self) {
        self.phase = Phase::Destroyed;
    }
}
