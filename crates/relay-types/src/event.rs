//! Progress events — the streamed output of a command execution.
//!
//! Each execution yields an ordered sequence of [`ProgressEvent`]s:
//! zero or more `running` events followed by exactly one terminal
//! event. The terminal-event invariant is enforced structurally by the
//! engine (units cannot emit terminal events themselves), not by this
//! type.
//!
//! # Wire Shape
//!
//! Events serialize to the transport contract:
//!
//! ```json
//! { "status": "running", "message": "step 2/5", "progress": 0.4, "data": {} }
//! ```
//!
//! Error events additionally carry a machine-readable `reason`:
//!
//! ```json
//! { "status": "error", "message": "...", "progress": 1.0,
//!   "data": {}, "reason": "unauthorized" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status of a single progress event.
///
/// | Variant | Terminal | Meaning |
/// |---------|----------|---------|
/// | `Running` | No | Intermediate progress |
/// | `Success` | Yes | Execution completed |
/// | `Error` | Yes | Execution failed (see [`ErrorReason`]) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Intermediate progress; more events will follow.
    Running,
    /// Terminal success. Closes the stream.
    Success,
    /// Terminal failure. Closes the stream.
    Error,
}

impl EventStatus {
    /// Returns `true` for `Success` and `Error`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason code carried by terminal `error` events.
///
/// The taxonomy deliberately distinguishes authorization and
/// validation failures from execution failures so callers can tell
/// "you may not do this" apart from "this broke while doing it".
///
/// | Variant | Emitted when |
/// |---------|--------------|
/// | `UnknownCommand` | Command name not in the registry |
/// | `Unauthorized` | Principal fails the command's permission rule |
/// | `InvalidParameters` | Payload rejected by the parameter schema |
/// | `ExecutionFailed` | The executable unit failed or panicked |
/// | `Timeout` | The caller-supplied deadline expired |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// No command registered under the requested name.
    UnknownCommand,
    /// Principal is not in `allowed_users` nor any allowed group.
    Unauthorized,
    /// Raw parameters failed schema validation.
    InvalidParameters,
    /// The executable unit returned an error or panicked.
    ExecutionFailed,
    /// The optional deadline expired before the unit finished.
    Timeout,
}

impl ErrorReason {
    /// Wire representation of the reason code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown_command",
            Self::Unauthorized => "unauthorized",
            Self::InvalidParameters => "invalid_parameters",
            Self::ExecutionFailed => "execution_failed",
            Self::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of streamed execution output.
///
/// # Invariants
///
/// - `progress` is within `[0.0, 1.0]`; constructors clamp.
/// - Terminal events carry `progress == 1.0`.
/// - `reason` is `Some` only on `error` events.
///
/// # Example
///
/// ```
/// use relay_types::{ErrorReason, ProgressEvent};
/// use serde_json::json;
///
/// let ev = ProgressEvent::running("copying files", 0.25)
///     .with_data("copied", json!(17));
/// assert_eq!(ev.progress, 0.25);
/// assert_eq!(ev.data["copied"], json!(17));
///
/// let err = ProgressEvent::error(ErrorReason::Timeout, "deadline expired");
/// assert_eq!(err.reason, Some(ErrorReason::Timeout));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Event status.
    pub status: EventStatus,
    /// Human-readable message.
    pub message: String,
    /// Progress fraction in `[0.0, 1.0]`. 1.0 on terminal events.
    pub progress: f64,
    /// Open-ended command-specific payload.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Machine-readable reason; present only on `error` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorReason>,
}

impl ProgressEvent {
    /// Creates an intermediate `running` event.
    ///
    /// The fraction is clamped into `[0.0, 1.0]`. Emission-side policy
    /// (keeping running fractions below 1.0, monotonicity) lives in
    /// the execution context, not here.
    #[must_use]
    pub fn running(message: impl Into<String>, progress: f64) -> Self {
        Self {
            status: EventStatus::Running,
            message: message.into(),
            progress: progress.clamp(0.0, 1.0),
            data: Map::new(),
            reason: None,
        }
    }

    /// Creates the terminal `success` event.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: EventStatus::Success,
            message: message.into(),
            progress: 1.0,
            data: Map::new(),
            reason: None,
        }
    }

    /// Creates a terminal `error` event with a reason code.
    #[must_use]
    pub fn error(reason: ErrorReason, message: impl Into<String>) -> Self {
        Self {
            status: EventStatus::Error,
            message: message.into(),
            progress: 1.0,
            data: Map::new(),
            reason: Some(reason),
        }
    }

    /// Adds a single key to the event's data payload.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Replaces the event's data payload wholesale.
    #[must_use]
    pub fn with_payload(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Returns `true` if this event closes the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
