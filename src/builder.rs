//! Mock construction and member registration
//!
//! [`MockBuilder`] owns the mock surface, its descriptor map, and the shared
//! invocation log. Members are registered one at a time via
//! [`create_method`](MockBuilder::create_method) /
//! [`create_property`](MockBuilder::create_property), or in bulk via the
//! [`create`](MockBuilder::create) factory.

use crate::emitter::EventEmitter;
use crate::log::{Event, InvocationLog};
use crate::member::{MemberDescriptor, Metadata, MethodOptions, PropertyOptions};
use crate::object::MockObject;
use crate::value::Value;
use std::sync::Arc;
use tracing::debug;

/// Bulk method registration input: bare names (defaults applied) or
/// name/options pairs.
pub enum MethodSpec {
    /// Names registered with [`MethodOptions::default`]
    Names(Vec<String>),
    /// Names registered with explicit options
    Configured(Vec<(String, MethodOptions)>),
}

impl MethodSpec {
    /// Register nothing.
    pub fn none() -> Self {
        Self::Names(Vec::new())
    }
}

impl<const N: usize> From<[&str; N]> for MethodSpec {
    fn from(names: [&str; N]) -> Self {
        Self::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[&str]> for MethodSpec {
    fn from(names: &[&str]) -> Self {
        Self::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for MethodSpec {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<(&str, MethodOptions)>> for MethodSpec {
    fn from(entries: Vec<(&str, MethodOptions)>) -> Self {
        Self::Configured(
            entries
                .into_iter()
                .map(|(name, options)| (name.to_string(), options))
                .collect(),
        )
    }
}

impl From<Vec<(String, MethodOptions)>> for MethodSpec {
    fn from(entries: Vec<(String, MethodOptions)>) -> Self {
        Self::Configured(entries)
    }
}

/// Bulk property registration input, mirroring [`MethodSpec`].
pub enum PropertySpec {
    /// Names registered with [`PropertyOptions::default`]
    Names(Vec<String>),
    /// Names registered with explicit options
    Configured(Vec<(String, PropertyOptions)>),
}

impl PropertySpec {
    /// Register nothing.
    pub fn none() -> Self {
        Self::Names(Vec::new())
    }
}

impl<const N: usize> From<[&str; N]> for PropertySpec {
    fn from(names: [&str; N]) -> Self {
        Self::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[&str]> for PropertySpec {
    fn from(names: &[&str]) -> Self {
        Self::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for PropertySpec {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<(&str, PropertyOptions)>> for PropertySpec {
    fn from(entries: Vec<(&str, PropertyOptions)>) -> Self {
        Self::Configured(
            entries
                .into_iter()
                .map(|(name, options)| (name.to_string(), options))
                .collect(),
        )
    }
}

impl From<Vec<(String, PropertyOptions)>> for PropertySpec {
    fn from(entries: Vec<(String, PropertyOptions)>) -> Self {
        Self::Configured(entries)
    }
}

/// Builds and owns one instrumented mock
///
/// The builder and the [`MockObject`] it exposes share the descriptor map
/// and the invocation log, so state accumulated while the system under test
/// exercises the surface is immediately visible through
/// [`metadata`](Self::metadata) and [`log`](Self::log).
pub struct MockBuilder {
    object: MockObject,
    metadata: Metadata,
    log: Arc<InvocationLog>,
    emitter: Option<Arc<EventEmitter>>,
}

impl Default for MockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBuilder {
    /// Create a builder over a fresh, empty surface.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a builder whose surface carries a base instance produced by
    /// `ctor` applied to `args`.
    ///
    /// The surface then answers [`is_instance_of::<T>`](MockObject::is_instance_of)
    /// checks while staying freely instrumentable.
    pub fn with_base<T, F>(ctor: F, args: &[Value]) -> Self
    where
        T: Send + Sync + 'static,
        F: FnOnce(&[Value]) -> T,
    {
        Self::build(Some(Box::new(ctor(args))))
    }

    fn build(base: Option<Box<dyn std::any::Any + Send + Sync>>) -> Self {
        let metadata = Metadata::new();
        let log = InvocationLog::new();
        let object = MockObject::new(metadata.clone(), log.clone(), base);
        Self {
            object,
            metadata,
            log,
            emitter: None,
        }
    }

    /// Bulk factory: register methods and properties in one shot.
    ///
    /// Both specs accept either bare name lists (defaults applied) or
    /// name/options pairs; see [`MethodSpec`] and [`PropertySpec`].
    pub fn create(methods: impl Into<MethodSpec>, properties: impl Into<PropertySpec>) -> Self {
        let mut mock = Self::new();
        mock.register_bulk(methods.into(), properties.into());
        mock
    }

    /// Bulk factory over a base instance; see [`with_base`](Self::with_base).
    pub fn create_with_base<T, F>(
        methods: impl Into<MethodSpec>,
        properties: impl Into<PropertySpec>,
        ctor: F,
        args: &[Value],
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: FnOnce(&[Value]) -> T,
    {
        let mut mock = Self::with_base(ctor, args);
        mock.register_bulk(methods.into(), properties.into());
        mock
    }

    fn register_bulk(&mut self, methods: MethodSpec, properties: PropertySpec) {
        match methods {
            MethodSpec::Names(names) => {
                for name in names {
                    self.create_method(&name, MethodOptions::default());
                }
            }
            MethodSpec::Configured(entries) => {
                for (name, options) in entries {
                    self.create_method(&name, options);
                }
            }
        }
        match properties {
            PropertySpec::Names(names) => {
                for name in names {
                    self.create_property(&name, PropertyOptions::default());
                }
            }
            PropertySpec::Configured(entries) => {
                for (name, options) in entries {
                    self.create_property(&name, options);
                }
            }
        }
    }

    /// Register a callable member. An existing member of the same name is
    /// silently overwritten.
    pub fn create_method(&mut self, name: &str, options: MethodOptions) {
        debug!(member = name, "registered mock method");
        self.metadata
            .insert(name, MemberDescriptor::Method(options.into_state()));
    }

    /// Register a readable/writable member. An existing member of the same
    /// name is silently overwritten.
    pub fn create_property(&mut self, name: &str, options: PropertyOptions) {
        debug!(member = name, "registered mock property");
        self.metadata
            .insert(name, MemberDescriptor::Property(options.into_state()));
    }

    /// Instrument the mock as a bidirectional event channel.
    ///
    /// Registers three dynamic methods `on`, `once`, and `emit` on the
    /// surface, each forwarding to a builder-owned [`EventEmitter`]
    /// (exposed via [`emitter`](Self::emitter)). Code under test can call
    /// `object.call("on", ...)` while the test publishes through the
    /// emitter, or vice versa. Completion-callback handling is disabled for
    /// all three, so listener arguments are never mistaken for callbacks;
    /// the calls are still recorded in the invocation log like any other.
    pub fn create_event_emitter(&mut self) -> Arc<EventEmitter> {
        let emitter = Arc::new(EventEmitter::new());

        let target = emitter.clone();
        self.create_method(
            "on",
            MethodOptions::default().no_callback().dynamic(move |_, args| {
                if let (Some(Value::Str(event)), Some(Value::Native(listener))) =
                    (args.first(), args.get(1))
                {
                    target.on(event, listener.clone());
                }
                Ok(Value::Undefined)
            }),
        );

        let target = emitter.clone();
        self.create_method(
            "once",
            MethodOptions::default().no_callback().dynamic(move |_, args| {
                if let (Some(Value::Str(event)), Some(Value::Native(listener))) =
                    (args.first(), args.get(1))
                {
                    target.once(event, listener.clone());
                }
                Ok(Value::Undefined)
            }),
        );

        let target = emitter.clone();
        self.create_method(
            "emit",
            MethodOptions::default().no_callback().dynamic(move |_, args| {
                match args.split_first() {
                    Some((Value::Str(event), rest)) => {
                        let fired = target.emit(event, rest)?;
                        Ok(Value::Bool(fired > 0))
                    }
                    _ => Ok(Value::Bool(false)),
                }
            }),
        );

        self.emitter = Some(emitter.clone());
        emitter
    }

    /// The mock surface handed to the system under test.
    pub fn object(&self) -> &MockObject {
        &self.object
    }

    /// The descriptor map: per-member configuration and live state.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The shared invocation log.
    pub fn log(&self) -> &Arc<InvocationLog> {
        &self.log
    }

    /// Copy of all recorded events, in order.
    pub fn invocations(&self) -> Vec<Event> {
        self.log.snapshot()
    }

    /// The internal emitter, present after
    /// [`create_event_emitter`](Self::create_event_emitter).
    pub fn emitter(&self) -> Option<&Arc<EventEmitter>> {
        self.emitter.as_ref()
    }
}

impl std::fmt::Debug for MockBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBuilder")
            .field("members", &self.metadata.names())
            .field("invocations", &self.log.len())
            .field("emitter", &self.emitter.is_some())
            .finish()
    }
}
