//! Error type shared by every parse path.

use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

/// An error produced while reading text into a typed value.
///
/// Writing never fails; only parsing, configuration parsing and explicit
/// type conversions produce an [`Error`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A scalar token could not be read as the expected type.
    #[error("invalid {expected} value: `{text}`")]
    InvalidValue { expected: &'static str, text: String },

    /// A date or time token matched no known encoding.
    #[error("invalid date `{text}`: {reason}")]
    InvalidDate { text: String, reason: String },

    /// A tuple or key-value pair contained a member it does not declare.
    #[error("`{type_path}` has no member named `{name}`")]
    UnknownMember {
        type_path: &'static str,
        name: String,
    },

    /// A member failed to deserialize and the active config throws on error.
    #[error("failed to set `{type_path}::{member}`")]
    Member {
        type_path: &'static str,
        member: String,
        #[source]
        source: Box<Error>,
    },

    /// A fixed-length container received the wrong number of items.
    #[error("`{type_path}` expects {expected} items, found {found}")]
    Length {
        type_path: &'static str,
        expected: usize,
        found: usize,
    },

    /// A value was required but the type has no default to fall back on.
    #[error("`{type_path}` has no default value")]
    NoDefault { type_path: &'static str },

    /// An erased value did not hold the type its descriptor promised.
    #[error("type mismatch: expected `{expected}`")]
    TypeMismatch { expected: &'static str },

    /// A config scope string contained an unknown key or value.
    #[error("invalid config: {0}")]
    Config(String),

    /// An error raised by a user callback.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an [`Error::InvalidValue`] from anything printable.
    #[inline]
    pub fn invalid(expected: &'static str, text: impl Into<String>) -> Self {
        Self::InvalidValue {
            expected,
            text: text.into(),
        }
    }

    /// Creates an [`Error::Custom`] with the given message.
    #[inline]
    pub fn custom(msg: impl core::fmt::Display) -> Self {
        Self::Custom(alloc::format!("{msg}"))
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Error;
    use alloc::boxed::Box;
    use alloc::string::ToString;
    use core::error::Error as _;

    #[test]
    fn member_error_keeps_source() {
        let err = Error::Member {
            type_path: "app::User",
            member: "age".into(),
            source: Box::new(Error::invalid("i32", "abc")),
        };
        assert_eq!(err.to_string(), "failed to set `app::User::age`");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("invalid i32 value: `abc`"));
    }
}
