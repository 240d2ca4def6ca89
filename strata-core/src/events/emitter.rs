//! Listener Registry
//!
//! The emitter keeps an ordered listener sequence per event-type name.
//! Insertion order determines dispatch order. Listeners are `Arc`-wrapped
//! closures; the same `Arc` may be registered multiple times and each
//! registration is dispatched. Removal matches by `Arc` identity and
//! removes the first match only.
//!
//! The emitter itself never invokes listeners. Dispatch takes a cloned
//! snapshot of the sequence via [`EventEmitter::subscribers`] so that a
//! listener can register or unregister reentrantly without holding any
//! lock on the registry.

use std::collections::HashMap;
use std::sync::Arc;

use super::event::ContextEvent;

/// A registered event listener.
pub type Listener = Arc<dyn Fn(&ContextEvent) + Send + Sync>;

/// Ordered listener sequences keyed by event-type name.
#[derive(Default)]
pub struct EventEmitter {
    listeners: HashMap<String, Vec<Listener>>,
}

impl EventEmitter {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener to the sequence for `kind`, creating the
    /// sequence if absent. Duplicates are allowed.
    pub fn on(&mut self, kind: &str, listener: Listener) {
        self.listeners
            .entry(kind.to_owned())
            .or_default()
            .push(listener);
    }

    /// Remove the first occurrence of `listener` from the sequence for
    /// `kind`, matching by `Arc` identity. No-op when the type or the
    /// listener is absent.
    pub fn off(&mut self, kind: &str, listener: &Listener) {
        if let Some(sequence) = self.listeners.get_mut(kind) {
            if let Some(index) = sequence.iter().position(|l| Arc::ptr_eq(l, listener)) {
                sequence.remove(index);
            }
        }
    }

    /// Snapshot the listener sequence for `kind` in registration order.
    ///
    /// Returns an empty vector when no listeners are registered, which
    /// makes dispatching to an unknown type a no-op rather than an error.
    pub fn subscribers(&self, kind: &str) -> Vec<Listener> {
        self.listeners.get(kind).cloned().unwrap_or_default()
    }

    /// Number of listeners currently registered for `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.listeners.get(kind).map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn recording_listener(log: Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Listener {
        Arc::new(move |_event| log.lock().unwrap().push(tag))
    }

    #[test]
    fn dispatch_order_follows_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut emitter = EventEmitter::new();

        emitter.on("change", recording_listener(log.clone(), "a"));
        emitter.on("change", recording_listener(log.clone(), "b"));

        let event = ContextEvent::new("change");
        for listener in emitter.subscribers("change") {
            listener(&event);
        }

        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_registration_dispatches_twice() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let listener: Listener = Arc::new(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut emitter = EventEmitter::new();
        emitter.on("change", listener.clone());
        emitter.on("change", listener);

        let event = ContextEvent::new("change");
        for l in emitter.subscribers("change") {
            l(&event);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn off_removes_first_occurrence_only() {
        let a: Listener = Arc::new(|_| {});
        let b: Listener = Arc::new(|_| {});

        let mut emitter = EventEmitter::new();
        emitter.on("change", a.clone());
        emitter.on("change", b.clone());
        emitter.on("change", a.clone());

        emitter.off("change", &a);

        let remaining = emitter.subscribers("change");
        assert_eq!(remaining.len(), 2);
        assert!(Arc::ptr_eq(&remaining[0], &b));
        assert!(Arc::ptr_eq(&remaining[1], &a));
    }

    #[test]
    fn off_is_noop_for_unknown_type_or_listener() {
        let a: Listener = Arc::new(|_| {});
        let stranger: Listener = Arc::new(|_| {});

        let mut emitter = EventEmitter::new();
        emitter.on("change", a);

        emitter.off("resize", &stranger);
        emitter.off("change", &stranger);

        assert_eq!(emitter.count("change"), 1);
    }

    #[test]
    fn subscribers_for_unknown_type_is_empty() {
        let emitter = EventEmitter::new();
        assert!(emitter.subscribers("change").is_empty());
    }
}
