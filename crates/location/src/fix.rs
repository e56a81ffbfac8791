//! Location fix value and display formatting.

use serde::{Deserialize, Serialize};

/// Placeholder body text used before the first fix arrives.
pub const UNKNOWN_LOCATION_TEXT: &str = "Unknown location";

/// A single position fix from a location provider.
///
/// Only the latest fix is ever retained by the service; no history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Capture timestamp in milliseconds since epoch.
    pub timestamp_ms: i64,
}

impl Location {
    /// Create a fix stamped with the current wall-clock time.
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Human-readable coordinates, e.g. `(41.38521, 2.17319)`.
    pub fn text(&self) -> String {
        format!("({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Notification body text for an optional fix.
///
/// Absence of a fix is a valid state, rendered as a placeholder.
pub fn location_text(location: Option<&Location>) -> String {
    match location {
        Some(fix) => fix.text(),
        None => UNKNOWN_LOCATION_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_text_formats_coordinates() {
        let fix = Location {
            latitude: 41.385206,
            longitude: 2.173194,
            timestamp_ms: 0,
        };
        assert_eq!(fix.text(), "(41.38521, 2.17319)");
    }

    #[test]
    fn test_location_text_placeholder_when_absent() {
        assert_eq!(location_text(None), UNKNOWN_LOCATION_TEXT);
    }

    #[test]
    fn test_location_text_negative_coordinates() {
        let fix = Location {
            latitude: -33.86882,
            longitude: 151.20930,
            timestamp_ms: 0,
        };
        assert_eq!(location_text(Some(&fix)), "(-33.86882, 151.20930)");
    }

    #[test]
    fn test_now_stamps_timestamp() {
        let fix = Location::now(0.0, 0.0);
        assert!(fix.timestamp_ms > 0);
    }
}
