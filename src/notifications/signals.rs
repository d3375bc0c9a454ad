//! App lifecycle signals.
//!
//! Other parts of the app publish [`AppSignal`]s on a shared [`SignalBus`];
//! the notification coordinator subscribes once at start and reacts by
//! clearing delivered notifications that are no longer relevant.
//!
//! Subscriptions are explicit: [`SignalBus::subscribe`] hands out a
//! receiver and dropping it is the unsubscribe.

use serde_json::Value;
use tokio::sync::broadcast;

use crate::constants::SIGNAL_CHANNEL_CAPACITY;

/// A process-wide app signal.
#[derive(Debug, Clone, PartialEq)]
pub enum AppSignal {
    /// A room was marked as read.
    ///
    /// The payload is expected to be the room id as a JSON string; anything
    /// else is ignored by subscribers.
    RoomMarkedAsRead(Option<Value>),
    /// The invites screen became visible.
    InvitesScreenAppeared,
}

impl AppSignal {
    /// Convenience constructor for a room id payload.
    pub fn room_marked_as_read(room_id: impl Into<String>) -> Self {
        Self::RoomMarkedAsRead(Some(Value::String(room_id.into())))
    }
}

/// Broadcast bus for [`AppSignal`]s.
///
/// Cloning the bus yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<AppSignal>,
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a signal to all current subscribers.
    ///
    /// Returns the number of subscribers that will see it. Publishing with
    /// no subscribers is not an error.
    pub fn publish(&self, signal: AppSignal) -> usize {
        log::trace!("[Signals] publish {signal:?}");
        self.tx.send(signal).unwrap_or(0)
    }

    /// Subscribe to signals published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppSignal> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
