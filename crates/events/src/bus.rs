//! Event bus abstraction for in-process broadcast.
//!
//! Provides a trait-based abstraction over event publication, so the service
//! core never depends on any host framework and can be tested in isolation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Handler invoked for each payload published on a subscribed topic.
pub type Subscriber = Arc<dyn Fn(&serde_json::Value) + Send + Sync + 'static>;

/// Trait for publishing events to same-process subscribers.
///
/// Topics are application-scoped strings; payloads are JSON. Nothing ever
/// crosses a process boundary.
pub trait EventBus: Send + Sync {
    /// Publish an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name/topic (e.g., "location:update")
    /// * `payload` - JSON payload to deliver
    fn publish(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// Process-local publish/subscribe bus.
///
/// Subscribers are invoked synchronously on the publisher's thread, in
/// registration order. There is no delivery to other processes.
#[derive(Default)]
pub struct LocalEventBus {
    subscribers: Mutex<HashMap<String, Vec<Subscriber>>>,
}

impl LocalEventBus {
    /// Create a new bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a topic.
    pub fn subscribe(&self, topic: &str, handler: Subscriber) {
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .entry(topic.to_string())
            .or_default()
            .push(handler);
    }

    /// Number of handlers registered for a topic.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .get(topic)
            .map_or(0, Vec::len)
    }
}

impl EventBus for LocalEventBus {
    fn publish(&self, topic: &str, payload: serde_json::Value) {
        // Clone the handler list so a subscriber may subscribe re-entrantly
        // without deadlocking on the registry lock.
        let handlers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .get(topic)
            .cloned()
            .unwrap_or_default();

        if handlers.is_empty() {
            tracing::trace!(topic, "no subscribers for topic");
            return;
        }

        for handler in handlers {
            handler(&payload);
        }
    }
}

/// In-memory event bus for testing.
///
/// Captures all published events for later inspection.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<PublishedEvent>>,
}

/// A captured event from [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured events.
    pub fn events(&self) -> Vec<PublishedEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// Get events for a specific topic.
    pub fn events_for(&self, topic: &str) -> Vec<PublishedEvent> {
        self.events
            .lock()
            .expect("event log poisoned")
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Clear all captured events.
    pub fn clear(&self) {
        self.events.lock().expect("event log poisoned").clear();
    }

    /// Get the number of captured events.
    pub fn len(&self) -> usize {
        self.events.lock().expect("event log poisoned").len()
    }

    /// Check if no events have been captured.
    pub fn is_empty(&self) -> bool {
        self.events.lock().expect("event log poisoned").is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn publish(&self, topic: &str, payload: serde_json::Value) {
        self.events
            .lock()
            .expect("event log poisoned")
            .push(PublishedEvent {
                topic: topic.to_string(),
                payload,
            });
    }
}

/// No-op event bus that discards all events.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn publish(&self, _topic: &str, _payload: serde_json::Value) {
        // Intentionally empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_local_bus_delivers_to_topic_subscribers() {
        let bus = LocalEventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);

        bus.subscribe(
            "location:update",
            Arc::new(move |_payload| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        bus.publish("location:update", json!({"latitude": 1.0}));
        bus.publish("location:update", json!({"latitude": 2.0}));
        bus.publish("other:topic", json!({}));

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_local_bus_multiple_subscribers() {
        let bus = LocalEventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits_clone = Arc::clone(&hits);
            bus.subscribe(
                "location:update",
                Arc::new(move |_| {
                    hits_clone.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        assert_eq!(bus.subscriber_count("location:update"), 3);

        bus.publish("location:update", json!({}));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_local_bus_payload_reaches_subscriber() {
        let bus = LocalEventBus::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);

        bus.subscribe(
            "location:update",
            Arc::new(move |payload| {
                *seen_clone.lock().unwrap() = Some(payload.clone());
            }),
        );

        bus.publish("location:update", json!({"latitude": 41.4, "longitude": 2.2}));

        let captured = seen.lock().unwrap().clone().unwrap();
        assert_eq!(captured["latitude"], 41.4);
    }

    #[test]
    fn test_in_memory_event_bus() {
        let bus = InMemoryEventBus::new();

        bus.publish("test:event1", json!({"key": "value1"}));
        bus.publish("test:event2", json!({"key": "value2"}));
        bus.publish("test:event1", json!({"key": "value3"}));

        assert_eq!(bus.len(), 3);
        assert_eq!(bus.events_for("test:event1").len(), 2);
        assert_eq!(bus.events_for("test:event2").len(), 1);
        assert_eq!(bus.events_for("test:missing").len(), 0);
    }

    #[test]
    fn test_in_memory_event_bus_clear() {
        let bus = InMemoryEventBus::new();

        bus.publish("test:event", json!({}));
        assert!(!bus.is_empty());

        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_null_event_bus() {
        let bus = NullEventBus;
        // Should not panic
        bus.publish("test:event", json!({"data": "ignored"}));
    }
}
