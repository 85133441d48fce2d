//! Execution engine for the Relay command service.
//!
//! The engine is the runtime layer sitting on top of the SDK crates:
//! it resolves a command from the registry, checks authorization,
//! validates parameters, then drives the executable unit, forwarding
//! its progress events to the caller in emission order and closing the
//! stream with exactly one terminal event.
//!
//! ```text
//! caller ──ExecutionRequest──► ExecutionEngine::execute
//!                                   │ lookup      → unknown_command
//!                                   │ authorize   → unauthorized
//!                                   │ validate    → invalid_parameters
//!                                   ▼
//!                              Runnable::run ──events──► mpsc ──► caller
//!                                   │
//!                                   └─ return / panic → terminal event
//! ```
//!
//! # Concurrency
//!
//! Each execution runs on its own tokio task; event sequences of
//! concurrent executions are fully independent, and no lock is held
//! across a suspension point. One execution's failure never affects
//! another — every failure mode is converted into a terminal `error`
//! event on that execution's stream alone.
//!
//! # Example
//!
//! ```
//! use relay_auth::{AuthEngine, GroupSnapshot, GroupStore};
//! use relay_command::CommandRegistry;
//! use relay_engine::{commands, ExecutionEngine, ExecutionRequest};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(GroupStore::from_snapshot(
//!     &GroupSnapshot::new().with_group("users", ["jane"]),
//! ));
//! let mut registry = CommandRegistry::new();
//! registry.register(commands::echo()).expect("register echo");
//!
//! let engine = ExecutionEngine::new(Arc::new(registry), AuthEngine::new(store));
//! let mut stream = engine.execute(ExecutionRequest::new(
//!     "echo",
//!     "jane",
//!     json!({"text": "hi"}),
//! ));
//!
//! let mut last = None;
//! while let Some(event) = stream.recv().await {
//!     last = Some(event);
//! }
//! assert_eq!(last.expect("terminal").data["result"], json!("hi"));
//! # }
//! ```

pub mod commands;
mod engine;
mod request;

pub use engine::ExecutionEngine;
pub use request::ExecutionRequest;
