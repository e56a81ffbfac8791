//! Location domain types and provider seam for waytrace.
//!
//! This crate holds the pure location domain:
//! - A `Location` fix value (coordinates + capture timestamp)
//! - The `UpdatePolicy` handed to a provider when subscribing
//! - The `LocationProvider` trait that abstracts the platform position
//!   source, so the service logic stays testable without any device APIs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                            │
//! │  fix.rs      - Location value and display formatting        │
//! │  policy.rs   - UpdatePolicy and accuracy tiers (pure)       │
//! │  provider.rs - LocationProvider trait and test providers    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Platform bindings implement `LocationProvider` outside this crate;
//! `NullProvider` and `ManualProvider` cover tests and headless runs.

mod fix;
mod policy;
mod provider;

pub use fix::{location_text, Location, UNKNOWN_LOCATION_TEXT};
pub use policy::{Accuracy, UpdatePolicy, DEFAULT_FASTEST_INTERVAL, DEFAULT_UPDATE_INTERVAL};
pub use provider::{LocationCallback, LocationProvider, ManualProvider, NullProvider, ProviderError};
