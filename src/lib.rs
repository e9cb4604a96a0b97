//! # Mimic
//!
//! Instrumented test-double construction. A [`MockBuilder`] synthesizes an
//! object with arbitrary methods and properties, each recording its
//! invocation history into a shared append-only log, optionally backed by a
//! real base instance so the mock answers "is-a" checks against that type.
//!
//! ## Design Principles
//!
//! - **Transparent**: the mock never raises on its own behalf during
//!   instrumented use; failures from caller-supplied callables propagate
//!   unmodified so tests can exercise failure paths
//! - **Ordered**: one global log records every get/set/call across all
//!   members, in access order
//! - **Synchronous**: completion callbacks and event listeners run inline,
//!   before the triggering call returns
//!
//! ## Example
//!
//! ```
//! use mimic::{MethodOptions, MockBuilder, Value};
//!
//! let mut mock = MockBuilder::new();
//! mock.create_method("fetch", MethodOptions::default().returning("payload"));
//!
//! let result = mock.object().call("fetch", &[Value::Int(7)]).unwrap();
//! assert_eq!(result, Value::str("payload"));
//!
//! let events = mock.invocations();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].member, "fetch");
//! assert_eq!(events[0].arguments(), Some(&[Value::Int(7)][..]));
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod builder;
pub mod emitter;
pub mod error;
pub mod log;
pub mod member;
pub mod object;
pub mod value;

pub use builder::{MethodSpec, MockBuilder, PropertySpec};
pub use emitter::EventEmitter;
pub use error::MockError;
pub use log::{Event, EventKind, InvocationLog};
pub use member::{
    DynamicFn, GetterFn, MemberDescriptor, Metadata, MethodOptions, MethodState, PropertyOptions,
    PropertyState, SetterFn,
};
pub use object::MockObject;
pub use value::{NativeFn, Value};
