//! Synchronous publish/subscribe channel
//!
//! Backs the event-emitter instrumentation of the mock surface. Unlike a
//! real event loop there is no deferred scheduling: `emit` invokes every
//! matching listener inline, in registration order, before returning.

use crate::error::MockError;
use crate::value::{NativeFn, Value};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique listener ID for tracking callbacks.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

fn next_listener_id() -> u64 {
    NEXT_LISTENER_ID.fetch_add(1, Ordering::SeqCst)
}

/// A registered event listener
struct Listener {
    id: u64,
    once: bool,
    callback: NativeFn,
}

/// Synchronous event emitter with listener bookkeeping
///
/// Listeners are plain [`NativeFn`] callbacks keyed by event name. One-shot
/// listeners registered via [`once`](Self::once) are removed before their
/// single invocation, so a listener that re-emits its own event cannot fire
/// itself twice.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Mutex<FxHashMap<String, Vec<Listener>>>,
}

impl EventEmitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`. Returns its ID.
    pub fn on(&self, event: &str, callback: NativeFn) -> u64 {
        self.add(event, callback, false)
    }

    /// Register a one-shot listener for `event`. Returns its ID.
    pub fn once(&self, event: &str, callback: NativeFn) -> u64 {
        self.add(event, callback, true)
    }

    fn add(&self, event: &str, callback: NativeFn, once: bool) -> u64 {
        let id = next_listener_id();
        self.listeners
            .lock()
            .entry(event.to_string())
            .or_default()
            .push(Listener { id, once, callback });
        id
    }

    /// Invoke all listeners registered for `event`, inline and in
    /// registration order, with the given arguments.
    ///
    /// Returns the number of listeners invoked. A listener error propagates
    /// immediately; listeners after the failing one are not invoked (and
    /// one-shot listeners already consumed stay removed).
    pub fn emit(&self, event: &str, args: &[Value]) -> Result<usize, MockError> {
        // Collect under the lock, invoke outside it, so listeners can
        // re-enter the emitter.
        let to_fire: Vec<NativeFn> = {
            let mut listeners = self.listeners.lock();
            match listeners.get_mut(event) {
                Some(entries) => {
                    let callbacks = entries.iter().map(|l| l.callback.clone()).collect();
                    entries.retain(|l| !l.once);
                    callbacks
                }
                None => Vec::new(),
            }
        };

        for callback in &to_fire {
            callback(args)?;
        }
        Ok(to_fire.len())
    }

    /// Remove one listener by ID. Returns true if it was present.
    pub fn remove_listener(&self, event: &str, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        match listeners.get_mut(event) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|l| l.id != id);
                entries.len() != before
            }
            None => false,
        }
    }

    /// Remove every listener for `event`.
    pub fn remove_all_listeners(&self, event: &str) {
        self.listeners.lock().remove(event);
    }

    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Names of events with at least one listener.
    pub fn event_names(&self) -> Vec<String> {
        self.listeners
            .lock()
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.lock();
        let counts: Vec<(String, usize)> = listeners
            .iter()
            .map(|(name, entries)| (name.clone(), entries.len()))
            .collect();
        f.debug_struct("EventEmitter")
            .field("listeners", &counts)
            .finish()
    }
}
