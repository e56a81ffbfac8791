//! Location updates service for waytrace.
//!
//! A long-running in-process component that subscribes to a location
//! provider, keeps the latest fix, rebroadcasts fixes on the in-process
//! event bus, and presents a persistent notification while running without
//! a bound client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                            │
//! │  lifecycle.rs - bind/unbind/rebind state machine (pure)     │
//! │  config.rs    - immutable process-wide configuration        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Seam Layer                              │
//! │  notifier.rs  - Notifier trait + notification building      │
//! │  host.rs      - Host trait (start/stop/foreground)          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  worker.rs    - dedicated background worker thread          │
//! │  service.rs   - UpdatesService orchestration + handle       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use waytrace_service::{ServiceConfig, UpdatesService};
//!
//! let service = UpdatesService::new(
//!     ServiceConfig::default(),
//!     provider, notifier, host, bus, settings,
//! );
//! service.on_create();
//!
//! let handle = service.on_bind();
//! handle.request_location_updates();
//!
//! // Client goes away; service keeps running foreground-visible.
//! service.on_unbind();
//! ```

mod config;
mod host;
mod lifecycle;
mod notifier;
mod service;
mod worker;

// Re-export main types
pub use config::{ServiceConfig, CHANNEL_API_LEVEL, DEFAULT_CHANNEL_ID, NOTIFICATION_ID};
pub use host::{Host, RecordingHost};
pub use lifecycle::{Lifecycle, Phase, ServiceMode, Transition};
pub use notifier::{
    build_notification, ChannelSpec, Importance, InMemoryNotifier, NotificationAction,
    NotificationRecord, Notifier, NullNotifier,
};
pub use service::{ServiceHandle, StartCommand, StartPolicy, UpdatesService};
pub use worker::ServiceWorker;
