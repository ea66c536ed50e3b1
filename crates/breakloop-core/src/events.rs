//! Change notifications for store mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every store mutation produces an Event.
/// Views subscribe through the [`EventBus`] and re-read the store on delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitCreated {
        habit_id: String,
        at: DateTime<Utc>,
    },
    HabitUpdated {
        habit_id: String,
        at: DateTime<Utc>,
    },
    /// `removed_urges` is non-zero only for cascading deletes.
    HabitDeleted {
        habit_id: String,
        removed_urges: usize,
        at: DateTime<Utc>,
    },
    UrgeLogged {
        urge_id: String,
        habit_id: String,
        at: DateTime<Utc>,
    },
    UrgeUpdated {
        urge_id: String,
        at: DateTime<Utc>,
    },
    UrgeDeleted {
        urge_id: String,
        at: DateTime<Utc>,
    },
}

/// Synchronous subscriber registry for store change notifications.
///
/// Subscribers run inline on the emitting thread, in subscription order.
/// That is all a single-threaded UI event loop needs to refresh views
/// after a mutation; there is no queueing and no delivery off-thread.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn Fn(&Event)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; it sees every event emitted afterwards.
    pub fn subscribe(&mut self, subscriber: impl Fn(&Event) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Deliver an event to all subscribers.
    pub fn emit(&self, event: &Event) {
        for subscriber in &self.subscribers {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
