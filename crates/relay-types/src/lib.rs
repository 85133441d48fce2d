//! Core types for the Relay command service.
//!
//! This crate provides the foundational types shared by every layer of
//! Relay:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SDK Layer                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  relay-types   : Principal, ProgressEvent, ErrorCode ◄─ HERE │
//! │  relay-auth    : PermissionRule, GroupStore, AuthEngine      │
//! │  relay-command : ParamSchema, Runnable, CommandRegistry      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Runtime Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  relay-engine  : ExecutionEngine, builtin commands           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Event Model
//!
//! Every command execution produces an ordered sequence of
//! [`ProgressEvent`]s: zero or more `running` events followed by
//! exactly one terminal event (`success` or `error`). Error events
//! carry a machine-readable [`ErrorReason`] so callers and audit logs
//! can tell "you may not do this" apart from "this broke while doing
//! it".
//!
//! # Example
//!
//! ```
//! use relay_types::{ErrorReason, EventStatus, Principal, ProgressEvent};
//!
//! let jane = Principal::new("jane");
//! assert_eq!(jane.as_str(), "jane");
//!
//! let running = ProgressEvent::running("working...", 0.4);
//! assert!(!running.is_terminal());
//!
//! let denied = ProgressEvent::error(ErrorReason::Unauthorized, "nope");
//! assert!(denied.is_terminal());
//! assert_eq!(denied.status, EventStatus::Error);
//! assert_eq!(denied.progress, 1.0);
//! ```

mod error;
mod event;
mod id;
mod principal;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use event::{ErrorReason, EventStatus, ProgressEvent};
pub use id::ExecutionId;
pub use principal::Principal;
