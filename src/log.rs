//! Append-only invocation log
//!
//! Every get, set, and call on the mock surface appends one [`Event`] here.
//! Order of appearance is the single source of truth for "what happened
//! when". Events are never mutated or removed once appended.

use crate::value::Value;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// What kind of access an [`Event`] records
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventKind {
    /// Method invocation with its positional arguments
    Call {
        /// Arguments in call order
        arguments: Vec<Value>,
    },
    /// Property read; `value` is the stored value at read time
    Get {
        /// The value observed
        value: Value,
    },
    /// Property write; `value` is the value the caller wrote
    Set {
        /// The value written
        value: Value,
    },
}

/// One recorded access to a mock member
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    /// Name of the member that was accessed
    pub member: String,
    /// What happened
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub(crate) fn call(member: &str, arguments: Vec<Value>) -> Self {
        Self {
            member: member.to_string(),
            kind: EventKind::Call { arguments },
        }
    }

    pub(crate) fn get(member: &str, value: Value) -> Self {
        Self {
            member: member.to_string(),
            kind: EventKind::Get { value },
        }
    }

    pub(crate) fn set(member: &str, value: Value) -> Self {
        Self {
            member: member.to_string(),
            kind: EventKind::Set { value },
        }
    }

    /// True if this event records a method call.
    pub fn is_call(&self) -> bool {
        matches!(self.kind, EventKind::Call { .. })
    }

    /// True if this event records a property read.
    pub fn is_get(&self) -> bool {
        matches!(self.kind, EventKind::Get { .. })
    }

    /// True if this event records a property write.
    pub fn is_set(&self) -> bool {
        matches!(self.kind, EventKind::Set { .. })
    }

    /// Call arguments, if this is a call event.
    pub fn arguments(&self) -> Option<&[Value]> {
        match &self.kind {
            EventKind::Call { arguments } => Some(arguments),
            _ => None,
        }
    }

    /// Observed or written value, if this is a get/set event.
    pub fn value(&self) -> Option<&Value> {
        match &self.kind {
            EventKind::Get { value } | EventKind::Set { value } => Some(value),
            EventKind::Call { .. } => None,
        }
    }

    /// Legacy string tag for this event, e.g. `"get_name"` or `"call_name"`.
    pub fn tag(&self) -> String {
        let op = match self.kind {
            EventKind::Call { .. } => "call",
            EventKind::Get { .. } => "get",
            EventKind::Set { .. } => "set",
        };
        format!("{op}_{}", self.member)
    }
}

/// Ordered record of every access across the mock's lifetime
///
/// Shared between the builder and the surface behind an `Arc`; interior
/// mutability keeps appends possible from `&self` dispatch paths.
#[derive(Default)]
pub struct InvocationLog {
    events: Mutex<Vec<Event>>,
}

impl InvocationLog {
    /// Create an empty log.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn append(&self, event: Event) {
        self.events.lock().push(event);
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Copy of all events, in append order.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Copy of all events touching `member`, in append order.
    pub fn events_for(&self, member: &str) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.member == member)
            .cloned()
            .collect()
    }

    /// Pretty-printed JSON dump of the log, for test debugging.
    pub fn to_json(&self) -> String {
        let events = self.events.lock();
        serde_json::to_string_pretty(&*events).unwrap_or_else(|_| "[]".to_string())
    }
}

impl std::fmt::Debug for InvocationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.events.lock().iter()).finish()
    }
}
