//! Identifier types for Relay.
//!
//! Execution identifiers are UUID-based so they are safe to log,
//! transmit across processes, and correlate without coordination.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a single command execution.
///
/// Generated per invocation by the engine, never persisted. Used to
/// correlate tracing spans and transport frames belonging to one
/// in-flight execution.
///
/// # Example
///
/// ```
/// use relay_types::ExecutionId;
///
/// let id1 = ExecutionId::new();
/// let id2 = ExecutionId::new();
/// assert_ne!(id1, id2);
/// assert!(format!("{id1}").starts_with("exec:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Creates a new random execution id (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exec:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniqueness() {
        assert_ne!(ExecutionId::new(), ExecutionId::new());
    }

    #[test]
    fn display_prefix() {
        let id = ExecutionId::new();
        let display = format!("{id}");
        assert!(display.starts_with("exec:"));
        assert!(display.contains(&id.uuid().to_string()));
    }

    #[test]
    fn default_is_random() {
        assert_ne!(ExecutionId::default(), ExecutionId::default());
    }
}
