//! Inbound execution requests.

use relay_types::{ExecutionId, Principal};
use serde::Deserialize;
use serde_json::Value;

/// One command invocation, created per call and discarded once its
/// stream closes.
///
/// Deserializes from the transport's inbound shape:
///
/// ```json
/// { "command": "echo", "params": {"text": "hi"}, "principal": "jane" }
/// ```
///
/// The `id` is generated locally (never supplied by the caller) and is
/// used to correlate tracing spans for the execution.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionRequest {
    /// Per-invocation identifier.
    #[serde(skip, default)]
    pub id: ExecutionId,
    /// Name of the command to invoke.
    pub command: String,
    /// The invoking principal.
    pub principal: Principal,
    /// Raw, not-yet-validated parameter payload.
    #[serde(default)]
    pub params: Value,
}

impl ExecutionRequest {
    /// Creates a request with a fresh [`ExecutionId`].
    #[must_use]
    pub fn new(
        command: impl Into<String>,
        principal: impl Into<Principal>,
        params: Value,
    ) -> Self {
        Self {
            id: ExecutionId::new(),
            command: command.into(),
            principal: principal.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_id_per_request() {
        let a = ExecutionRequest::new("echo", "jane", json!({}));
        let b = ExecutionRequest::new("echo", "jane", json!({}));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn deserializes_transport_shape() {
        let raw = r#"{"command": "echo", "params": {"text": "hi"}, "principal": "jane"}"#;
        let req: ExecutionRequest = serde_json::from_str(raw).expect("deserialize");

        assert_eq!(req.command, "echo");
        assert_eq!(req.principal, "jane".into());
        assert_eq!(req.params["text"], json!("hi"));
    }

    #[test]
    fn params_default_to_null() {
        let raw = r#"{"command": "noop", "principal": "jane"}"#;
        let req: ExecutionRequest = serde_json::from_str(raw).expect("deserialize");
        assert!(req.params.is_null());
    }
}
