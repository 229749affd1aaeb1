//! Synchronous fan-out event bus.

/// Fan-out bus for change notifications emitted by a state machine.
///
/// Listeners are invoked inline on the emitting call; a state machine only
/// emits after its state change is complete, so a listener always observes
/// the post-transition state.
pub struct EventBus<E> {
    listeners: Vec<Box<dyn Fn(&E) + Send + Sync>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&E) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus: EventBus<u32> = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |value| {
            c2.fetch_add(*value as usize, Ordering::SeqCst);
        }));

        bus.emit(&10);
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus: EventBus<&str> = EventBus::default();
        bus.emit(&"nobody listening");
        assert_eq!(bus.listener_count(), 0);
    }
}
