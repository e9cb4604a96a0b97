//! The mock surface
//!
//! [`MockObject`] is what the system under test receives. Every access goes
//! through name-keyed dispatch: `call` for methods, `get`/`set` for
//! properties. Each access appends one event to the shared invocation log
//! before any configured behavior runs.

use crate::error::MockError;
use crate::log::{Event, InvocationLog};
use crate::member::{DynamicFn, MemberDescriptor, Metadata};
use crate::value::{NativeFn, Value};
use std::any::Any;
use std::sync::Arc;
use tracing::trace;

/// The externally-visible mock surface
///
/// Shares its descriptor map and invocation log with the
/// [`MockBuilder`](crate::MockBuilder) that produced it. Optionally carries a
/// base instance of a caller-supplied type, so the mock can answer "is-a"
/// checks against that type while staying freely instrumentable.
pub struct MockObject {
    metadata: Metadata,
    log: Arc<InvocationLog>,
    base: Option<Box<dyn Any + Send + Sync>>,
}

impl MockObject {
    pub(crate) fn new(
        metadata: Metadata,
        log: Arc<InvocationLog>,
        base: Option<Box<dyn Any + Send + Sync>>,
    ) -> Self {
        Self {
            metadata,
            log,
            base,
        }
    }

    /// Invoke a mocked method with positional arguments.
    ///
    /// Records the call (globally and in the member's own history), then
    /// produces the configured result: the dynamic callable's output when one
    /// is configured, the static return value otherwise. Errors from the
    /// dynamic callable propagate unmodified.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, MockError> {
        self.call_inner(name, args, None)
    }

    /// Invoke a mocked method with an explicit completion callback.
    ///
    /// When the member was registered with callbacks enabled (the default),
    /// `callback` is invoked synchronously with the member's configured
    /// callback arguments before the return value is produced. When the
    /// member was registered with [`no_callback`](crate::MethodOptions::no_callback),
    /// `callback` is never invoked.
    pub fn call_with_callback(
        &self,
        name: &str,
        args: &[Value],
        callback: &NativeFn,
    ) -> Result<Value, MockError> {
        self.call_inner(name, args, Some(callback))
    }

    fn call_inner(
        &self,
        name: &str,
        args: &[Value],
        callback: Option<&NativeFn>,
    ) -> Result<Value, MockError> {
        type MethodSnapshot = (Option<DynamicFn>, Value, bool, Vec<Value>);
        let snapshot: Result<MethodSnapshot, MockError> = self
            .metadata
            .with_member_mut(name, |descriptor| match descriptor {
                MemberDescriptor::Method(method) => {
                    method.calls.push(args.to_vec());
                    Ok((
                        method.dynamic.clone(),
                        method.return_value.clone(),
                        method.invoke_callback,
                        method.callback_args.clone(),
                    ))
                }
                MemberDescriptor::Property(_) => Err(MockError::not_a_method(name)),
            })
            .ok_or_else(|| MockError::unknown(name))?;
        let (dynamic, return_value, invoke_callback, callback_args) = snapshot?;

        self.log.append(Event::call(name, args.to_vec()));
        trace!(member = name, argc = args.len(), "mock method call");

        if invoke_callback
            && let Some(callback) = callback
        {
            callback(&callback_args)?;
        }

        match dynamic {
            Some(f) => f(self, args),
            None => Ok(return_value),
        }
    }

    /// Read a mocked property.
    ///
    /// Appends a get event recording the stored value, then returns that
    /// value, or the custom getter's result when one is configured.
    pub fn get(&self, name: &str) -> Result<Value, MockError> {
        let snapshot = self
            .metadata
            .with_member(name, |descriptor| match descriptor {
                MemberDescriptor::Property(property) => {
                    Ok((property.value.clone(), property.get_override.clone()))
                }
                MemberDescriptor::Method(_) => Err(MockError::not_a_property(name)),
            })
            .ok_or_else(|| MockError::unknown(name))?;
        let (value, get_override) = snapshot?;

        self.log.append(Event::get(name, value.clone()));
        trace!(member = name, "mock property get");

        Ok(match get_override {
            Some(getter) => getter(&value),
            None => value,
        })
    }

    /// Write a mocked property.
    ///
    /// Appends a set event recording the written value and the value to the
    /// member's assignment history, then stores it, or lets the custom setter
    /// control storage when one is configured.
    pub fn set(&self, name: &str, value: Value) -> Result<(), MockError> {
        self.metadata
            .with_member_mut(name, |descriptor| match descriptor {
                MemberDescriptor::Property(property) => {
                    self.log.append(Event::set(name, value.clone()));
                    trace!(member = name, "mock property set");
                    property.assignments.push(value.clone());
                    match &property.set_override {
                        Some(setter) => setter(&mut property.value, value),
                        None => property.value = value,
                    }
                    Ok(())
                }
                MemberDescriptor::Method(_) => Err(MockError::not_a_property(name)),
            })
            .ok_or_else(|| MockError::unknown(name))?
    }

    /// True if `name` has been registered as either member kind.
    pub fn has(&self, name: &str) -> bool {
        self.metadata.contains(name)
    }

    /// True if `name` is a registered method.
    pub fn is_method(&self, name: &str) -> bool {
        self.metadata
            .with_member(name, MemberDescriptor::is_method)
            .unwrap_or(false)
    }

    /// True if `name` is a registered property.
    pub fn is_property(&self, name: &str) -> bool {
        self.metadata
            .with_member(name, MemberDescriptor::is_property)
            .unwrap_or(false)
    }

    /// Registered member names, in registration order.
    pub fn member_names(&self) -> Vec<String> {
        self.metadata.names()
    }

    /// Borrow the base instance, if the mock was built over one of type `T`.
    pub fn base<T: 'static>(&self) -> Option<&T> {
        self.base.as_ref()?.downcast_ref()
    }

    /// True if the mock was built over a base instance of type `T`.
    pub fn is_instance_of<T: 'static>(&self) -> bool {
        self.base::<T>().is_some()
    }
}

impl std::fmt::Debug for MockObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockObject")
            .field("members", &self.metadata.names())
            .field("has_base", &self.base.is_some())
            .finish()
    }
}
