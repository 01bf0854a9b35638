//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{LifecycleEvent, StockEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Spawn requests, seating, discards, lookup misses and ignored removals
    Stock,
    /// Container initialization, lock and despawn
    Lifecycle,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Stock(StockEvent),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Stock(_) => Topic::Stock,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    stock: broadcast::Sender<Event>,
    lifecycle: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stock: broadcast::channel(capacity).0,
            lifecycle: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Stock => &self.stock,
            Topic::Lifecycle => &self.lifecycle,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to several topics at once.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holding_core::ContainerId;

    #[test]
    fn routes_events_by_topic() {
        let bus = EventBus::with_capacity(4);
        let mut stock = bus.subscribe(Topic::Stock);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);

        bus.publish(Event::Lifecycle(LifecycleEvent::Locked {
            container: ContainerId(3),
        }));

        assert!(stock.try_recv().is_err());
        let event = lifecycle.try_recv().unwrap();
        assert_eq!(event.topic(), Topic::Lifecycle);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::Lifecycle(LifecycleEvent::Despawned {
            container: ContainerId(0),
        }));
    }
}
