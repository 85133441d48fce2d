//! Principal (caller identity) type.
//!
//! A [`Principal`] represents the actor invoking or managing commands,
//! separating "who is acting" from "what they are allowed to do".
//! Permission checking lives in `relay-auth`; this type is pure
//! identity.

use serde::{Deserialize, Serialize};

/// An identified caller invoking or managing commands.
///
/// Principals are opaque string identifiers supplied by the transport
/// layer (e.g. a username from an authenticated session). Relay never
/// interprets the string beyond equality and hashing.
///
/// # Example
///
/// ```
/// use relay_types::Principal;
///
/// let jane = Principal::new("jane");
/// let also_jane: Principal = "jane".into();
/// assert_eq!(jane, also_jane);
/// assert_eq!(jane.to_string(), "jane");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Creates a principal from any string-like identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
