//! Per-member descriptors and registration options
//!
//! Each registered member of a mock surface has exactly one
//! [`MemberDescriptor`]: its configuration plus the live state that
//! accumulates while the system under test exercises the mock (per-member
//! call and assignment histories).

use crate::error::MockError;
use crate::object::MockObject;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Callable that computes a method's return value per call.
///
/// Receives the mock surface as receiver plus the original call arguments.
pub type DynamicFn =
    Arc<dyn Fn(&MockObject, &[Value]) -> Result<Value, MockError> + Send + Sync>;

/// Custom property getter override. Receives the stored value.
pub type GetterFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Custom property setter override. Receives the storage slot and the
/// written value, and decides what (if anything) to store.
pub type SetterFn = Arc<dyn Fn(&mut Value, Value) + Send + Sync>;

/// Configuration and live state of a mocked method
#[derive(Clone)]
pub struct MethodState {
    /// Static return value, used when no dynamic callable is configured
    pub return_value: Value,
    /// Per-call return value computation; takes precedence over
    /// `return_value` when present
    pub dynamic: Option<DynamicFn>,
    /// Whether an explicit completion callback passed at call time is invoked
    pub invoke_callback: bool,
    /// Arguments handed to the completion callback
    pub callback_args: Vec<Value>,
    /// This member's own call history, one argument list per invocation
    pub calls: Vec<Vec<Value>>,
}

/// Configuration and live state of a mocked property
#[derive(Clone)]
pub struct PropertyState {
    /// Current stored value
    pub value: Value,
    /// Custom getter override
    pub get_override: Option<GetterFn>,
    /// Custom setter override
    pub set_override: Option<SetterFn>,
    /// Descriptor attribute, recorded as configured
    pub enumerable: bool,
    /// Descriptor attribute, recorded as configured
    pub configurable: bool,
    /// Every value ever written, in write order
    pub assignments: Vec<Value>,
}

/// Descriptor for one member of the mock surface
#[derive(Clone)]
pub enum MemberDescriptor {
    /// A callable member
    Method(MethodState),
    /// A readable/writable member
    Property(PropertyState),
}

impl MemberDescriptor {
    /// True for method members.
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }

    /// True for property members.
    pub fn is_property(&self) -> bool {
        matches!(self, Self::Property(_))
    }

    /// Borrow the method state, if this is a method.
    pub fn as_method(&self) -> Option<&MethodState> {
        match self {
            Self::Method(m) => Some(m),
            Self::Property(_) => None,
        }
    }

    /// Borrow the property state, if this is a property.
    pub fn as_property(&self) -> Option<&PropertyState> {
        match self {
            Self::Property(p) => Some(p),
            Self::Method(_) => None,
        }
    }
}

impl std::fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Method(m) => f
                .debug_struct("Method")
                .field("return_value", &m.return_value)
                .field("dynamic", &m.dynamic.is_some())
                .field("invoke_callback", &m.invoke_callback)
                .field("callback_args", &m.callback_args)
                .field("calls", &m.calls.len())
                .finish(),
            Self::Property(p) => f
                .debug_struct("Property")
                .field("value", &p.value)
                .field("enumerable", &p.enumerable)
                .field("configurable", &p.configurable)
                .field("assignments", &p.assignments.len())
                .finish(),
        }
    }
}

/// Options for [`MockBuilder::create_method`](crate::MockBuilder::create_method)
///
/// All fields optional; defaults are a static `Undefined` return value, an
/// honored completion callback, and no callback arguments.
#[derive(Clone)]
pub struct MethodOptions {
    return_value: Value,
    dynamic: Option<DynamicFn>,
    invoke_callback: bool,
    callback_args: Vec<Value>,
}

impl Default for MethodOptions {
    fn default() -> Self {
        Self {
            return_value: Value::Undefined,
            dynamic: None,
            invoke_callback: true,
            callback_args: Vec::new(),
        }
    }
}

impl MethodOptions {
    /// Static return value for every call.
    pub fn returning(mut self, value: impl Into<Value>) -> Self {
        self.return_value = value.into();
        self
    }

    /// Compute the return value per call. Takes precedence over
    /// [`returning`](Self::returning).
    pub fn dynamic<F>(mut self, f: F) -> Self
    where
        F: Fn(&MockObject, &[Value]) -> Result<Value, MockError> + Send + Sync + 'static,
    {
        self.dynamic = Some(Arc::new(f));
        self
    }

    /// Never invoke a completion callback, even when one is supplied.
    pub fn no_callback(mut self) -> Self {
        self.invoke_callback = false;
        self
    }

    /// Arguments handed to the completion callback when it fires.
    pub fn callback_args(mut self, args: Vec<Value>) -> Self {
        self.callback_args = args;
        self
    }

    pub(crate) fn into_state(self) -> MethodState {
        MethodState {
            return_value: self.return_value,
            dynamic: self.dynamic,
            invoke_callback: self.invoke_callback,
            callback_args: self.callback_args,
            calls: Vec::new(),
        }
    }
}

/// Options for [`MockBuilder::create_property`](crate::MockBuilder::create_property)
#[derive(Clone)]
pub struct PropertyOptions {
    initial: Value,
    get_override: Option<GetterFn>,
    set_override: Option<SetterFn>,
    enumerable: bool,
    configurable: bool,
}

impl Default for PropertyOptions {
    fn default() -> Self {
        Self {
            initial: Value::Undefined,
            get_override: None,
            set_override: None,
            enumerable: true,
            configurable: true,
        }
    }
}

impl PropertyOptions {
    /// Initial stored value.
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = value.into();
        self
    }

    /// Custom getter; reads are still logged, but the returned value comes
    /// from this override.
    pub fn get<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.get_override = Some(Arc::new(f));
        self
    }

    /// Custom setter; writes are still logged, but this override controls
    /// what gets stored.
    pub fn set<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Value, Value) + Send + Sync + 'static,
    {
        self.set_override = Some(Arc::new(f));
        self
    }

    /// Descriptor attribute, default true.
    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// Descriptor attribute, default true.
    pub fn configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    pub(crate) fn into_state(self) -> PropertyState {
        PropertyState {
            value: self.initial,
            get_override: self.get_override,
            set_override: self.set_override,
            enumerable: self.enumerable,
            configurable: self.configurable,
            assignments: Vec::new(),
        }
    }
}

/// Shared, insertion-ordered map of member name to descriptor
///
/// Cloning is shallow; the builder and its surface hold the same map.
#[derive(Clone, Default)]
pub struct Metadata {
    members: Arc<RwLock<IndexMap<String, MemberDescriptor>>>,
}

impl Metadata {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register or silently overwrite a descriptor.
    pub(crate) fn insert(&self, name: &str, descriptor: MemberDescriptor) {
        self.members.write().insert(name.to_string(), descriptor);
    }

    pub(crate) fn with_member<R>(
        &self,
        name: &str,
        f: impl FnOnce(&MemberDescriptor) -> R,
    ) -> Option<R> {
        self.members.read().get(name).map(f)
    }

    pub(crate) fn with_member_mut<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut MemberDescriptor) -> R,
    ) -> Option<R> {
        self.members.write().get_mut(name).map(f)
    }

    /// True if `name` has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.members.read().contains_key(name)
    }

    /// Number of registered members.
    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    /// True if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Member names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.members.read().keys().cloned().collect()
    }

    /// Snapshot of one member's descriptor.
    pub fn descriptor(&self, name: &str) -> Option<MemberDescriptor> {
        self.members.read().get(name).cloned()
    }

    /// Per-member call history of a mocked method; empty when the member is
    /// absent or not a method.
    pub fn method_calls(&self, name: &str) -> Vec<Vec<Value>> {
        self.with_member(name, |d| {
            d.as_method().map(|m| m.calls.clone()).unwrap_or_default()
        })
        .unwrap_or_default()
    }

    /// Per-member assignment history of a mocked property; empty when the
    /// member is absent or not a property.
    pub fn assignments(&self, name: &str) -> Vec<Value> {
        self.with_member(name, |d| {
            d.as_property()
                .map(|p| p.assignments.clone())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }
}

impl std::fmt::Debug for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.members.read().iter()).finish()
    }
}
