//! Event bus for in-process notifications.
//!
//! Each coordinator broadcasts its notifications through a bounded channel.
//! Dispatch is synchronous and single-threaded: listeners drain the bus on
//! the host's update loop.

use crossbeam_channel::{bounded, Receiver, Sender};

/// Default event bus capacity.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Bounded event bus broadcasting values of one event type.
#[derive(Debug)]
pub struct EventBus<E> {
    /// Sender for broadcasting events
    sender: Sender<E>,
    /// Receiver for collecting events
    receiver: Receiver<E>,
    /// Channel capacity
    capacity: usize,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl<E> EventBus<E> {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: E) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<E> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<E> {
        self.sender.clone()
    }
}

/// Typed event handler trait.
pub trait EventHandler<E>: Send + Sync {
    /// Handles an event.
    fn handle(&self, event: &E);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        bus.publish(1u32);
        bus.publish(2u32);

        assert_eq!(bus.pending_count(), 2);
        assert_eq!(bus.drain(), vec![1, 2]);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(2);
        bus.publish(1u32);
        bus.publish(2u32);
        bus.publish(3u32);

        assert_eq!(bus.drain(), vec![1, 2]);
    }

    #[test]
    fn test_sender_handle() {
        let bus = EventBus::new(4);
        let sender = bus.sender();
        sender.try_send(9u32).expect("Send failed");
        assert_eq!(bus.drain(), vec![9]);
    }

    #[test]
    fn test_default_capacity() {
        let bus: EventBus<u32> = EventBus::default();
        assert_eq!(bus.capacity(), DEFAULT_BUS_CAPACITY);
    }
}
