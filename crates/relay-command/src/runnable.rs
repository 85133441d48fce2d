//! The executable-unit contract implemented by command authors.

use crate::{Cancelled, ExecContext, Params};
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// The command-specific logic that performs work and emits events.
///
/// A unit receives validated [`Params`], may emit any number of
/// intermediate `running` events through the [`ExecContext`], and
/// finishes by returning — the engine turns `Ok(Outcome)` into the
/// terminal `success` event and `Err(RunError)` into the terminal
/// `error` event. A panic is caught at the task boundary and becomes
/// an `execution_failed` terminal, so no failure mode leaves the
/// stream unterminated.
///
/// Units may perform arbitrary external work (I/O, subprocesses) but
/// should emit at least one intermediate event during long-lived
/// operations so callers can tell liveness from a hang.
///
/// # Example
///
/// ```
/// use relay_command::{ExecContext, Outcome, Params, RunError, Runnable};
/// use serde_json::json;
///
/// struct Shout;
///
/// #[async_trait::async_trait]
/// impl Runnable for Shout {
///     async fn run(&self, params: Params, ctx: &ExecContext) -> Result<Outcome, RunError> {
///         let text = params
///             .str("text")
///             .ok_or_else(|| RunError::new("missing text"))?;
///         ctx.progress("shouting", 0.5).await?;
///         Ok(Outcome::new("shouted").with_data("result", json!(text.to_uppercase())))
///     }
/// }
/// ```
#[async_trait]
pub trait Runnable: Send + Sync {
    /// Runs the unit to completion.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on command-specific failure; the engine
    /// reports it as a terminal `error` event.
    async fn run(&self, params: Params, ctx: &ExecContext) -> Result<Outcome, RunError>;
}

/// Successful result of a unit, source of the terminal `success`
/// event's message and data.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    message: String,
    data: Map<String, Value>,
}

impl Outcome {
    /// Creates an outcome with a terminal message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Adds one key to the result payload.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Replaces the result payload wholesale.
    #[must_use]
    pub fn with_payload(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Terminal message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Decomposes into message and payload for the terminal event.
    #[must_use]
    pub fn into_parts(self) -> (String, Map<String, Value>) {
        (self.message, self.data)
    }
}

/// Command-specific failure, source of the terminal `error` event's
/// message and data.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RunError {
    message: String,
    data: Map<String, Value>,
}

impl RunError {
    /// Creates a failure with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Adds one key to the failure payload.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Decomposes into message and payload for the terminal event.
    #[must_use]
    pub fn into_parts(self) -> (String, Map<String, Value>) {
        (self.message, self.data)
    }
}

impl From<String> for RunError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<std::io::Error> for RunError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<Cancelled> for RunError {
    fn from(err: Cancelled) -> Self {
        Self::new(err.to_string())
    }
}
