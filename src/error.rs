//! Mock surface error types

use thiserror::Error;

/// Errors raised by the mock surface dispatch or by caller-supplied callables.
///
/// The builder itself never validates registration input; these errors only
/// arise when the system under test touches a member that was never
/// registered, touches it with the wrong kind of access, or when a
/// caller-supplied callable deliberately fails to simulate a broken
/// dependency.
#[derive(Debug, Error)]
pub enum MockError {
    /// Get/set/call on a name that was never registered
    #[error("unknown mock member: {name}")]
    UnknownMember {
        /// The member name that was looked up
        name: String,
    },

    /// Called a member that was registered as a property
    #[error("mock member is not a method: {name}")]
    NotAMethod {
        /// The member name
        name: String,
    },

    /// Read or wrote a member that was registered as a method
    #[error("mock member is not a property: {name}")]
    NotAProperty {
        /// The member name
        name: String,
    },

    /// Invoked a value that is not callable
    #[error("value is not callable")]
    NotCallable,

    /// Failure raised by a caller-supplied dynamic value or callback.
    ///
    /// Propagates unmodified through the mock to the system under test.
    #[error("simulated failure: {0}")]
    Simulated(String),
}

impl MockError {
    pub(crate) fn unknown(name: &str) -> Self {
        Self::UnknownMember {
            name: name.to_string(),
        }
    }

    pub(crate) fn not_a_method(name: &str) -> Self {
        Self::NotAMethod {
            name: name.to_string(),
        }
    }

    pub(crate) fn not_a_property(name: &str) -> Self {
        Self::NotAProperty {
            name: name.to_string(),
        }
    }
}
