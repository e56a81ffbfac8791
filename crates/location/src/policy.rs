//! Update policy handed to a provider when subscribing.
//!
//! Pure domain logic - no I/O, no platform dependencies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Desired interval between fixes. Inexact; fixes may be more or less frequent.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(10_000);

/// Fastest rate for fixes. The provider never delivers more often than this.
pub const DEFAULT_FASTEST_INTERVAL: Duration = Duration::from_millis(5_000);

/// Accuracy tier requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    /// Best available fix quality, highest power draw.
    #[default]
    High,
    /// Coarser fixes traded for battery.
    Balanced,
    /// Cell/wifi-grade positioning only.
    LowPower,
}

impl Accuracy {
    pub fn label(&self) -> &'static str {
        match self {
            Accuracy::High => "high",
            Accuracy::Balanced => "balanced",
            Accuracy::LowPower => "low-power",
        }
    }
}

impl std::fmt::Display for Accuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parameters for a periodic location subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePolicy {
    /// Nominal interval between fixes.
    pub interval: Duration,

    /// Lower bound on the delivery interval.
    pub fastest_interval: Duration,

    /// Requested accuracy tier.
    pub accuracy: Accuracy,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_UPDATE_INTERVAL,
            fastest_interval: DEFAULT_FASTEST_INTERVAL,
            accuracy: Accuracy::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = UpdatePolicy::default();
        assert_eq!(policy.interval, Duration::from_millis(10_000));
        assert_eq!(policy.fastest_interval, Duration::from_millis(5_000));
        assert_eq!(policy.accuracy, Accuracy::High);
    }

    #[test]
    fn test_fastest_never_slower_than_interval() {
        let policy = UpdatePolicy::default();
        assert!(policy.fastest_interval <= policy.interval);
    }
}
