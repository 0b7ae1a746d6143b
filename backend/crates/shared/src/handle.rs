//! Player Handle
//!
//! Type-safe wrapper for the external player identifier.
//!
//! A handle is the key used for upstream lookups, so it must be safe to
//! embed in a URL path segment without escaping. Validation happens at
//! construction; a `Handle` in hand is always well-formed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted handle length
pub const MAX_HANDLE_LEN: usize = 64;

/// Validated player handle
///
/// Usage:
/// ```
/// use kernel::handle::Handle;
/// let handle: Handle = "hikaru".parse().unwrap();
/// assert_eq!(handle.as_str(), "hikaru");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

/// Error when validating a handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("handle must not be empty")]
    Empty,
    #[error("handle exceeds {MAX_HANDLE_LEN} characters")]
    TooLong,
    #[error("handle contains invalid character: {0:?}")]
    InvalidChar(char),
}

impl Handle {
    /// Validate and wrap a raw handle string
    ///
    /// Accepts ASCII alphanumerics plus `_`, `-` and `.`, the set that is
    /// safe in a URL path segment without percent-encoding.
    pub fn new(raw: impl Into<String>) -> Result<Self, HandleError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(HandleError::Empty);
        }
        if raw.len() > MAX_HANDLE_LEN {
            return Err(HandleError::TooLong);
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(HandleError::InvalidChar(bad));
        }
        Ok(Self(raw))
    }

    /// Get the handle as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_handles() {
        assert!(Handle::new("hikaru").is_ok());
        assert!(Handle::new("magnus-carlsen").is_ok());
        assert!(Handle::new("player_42").is_ok());
        assert!(Handle::new("a.b").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Handle::new(""), Err(HandleError::Empty));
    }

    #[test]
    fn test_rejects_too_long() {
        let raw = "x".repeat(MAX_HANDLE_LEN + 1);
        assert_eq!(Handle::new(raw), Err(HandleError::TooLong));
    }

    #[test]
    fn test_rejects_url_unsafe_chars() {
        assert_eq!(Handle::new("a/b"), Err(HandleError::InvalidChar('/')));
        assert_eq!(Handle::new("a b"), Err(HandleError::InvalidChar(' ')));
        assert_eq!(Handle::new("a?b"), Err(HandleError::InvalidChar('?')));
        assert_eq!(Handle::new("héros"), Err(HandleError::InvalidChar('é')));
    }

    #[test]
    fn test_serde_roundtrip() {
        let handle: Handle = serde_json::from_str(r#""hikaru""#).unwrap();
        assert_eq!(handle.as_str(), "hikaru");
        assert_eq!(serde_json::to_string(&handle).unwrap(), r#""hikaru""#);

        let bad: Result<Handle, _> = serde_json::from_str(r#""not a handle""#);
        assert!(bad.is_err());
    }
}
