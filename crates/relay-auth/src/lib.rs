//! Authorization primitives for Relay.
//!
//! This crate answers one question: *may this principal invoke this
//! command?* It is split into pure data and a thin decision layer:
//!
//! ```text
//! GroupSnapshot (serde boundary data)
//!       │ loaded at startup
//!       ▼
//! GroupStore (group ⇄ principal maps + admin set, one RwLock)
//!       │ queried by
//!       ▼
//! AuthEngine::authorize(principal, PermissionRule) -> bool
//! ```
//!
//! # Decision Rule
//!
//! A principal is authorized for a command iff it appears in the
//! rule's `allowed_users` OR is a member of any group in
//! `allowed_groups`. A rule with both sets empty denies everyone
//! (fail-closed).
//!
//! # Concurrency
//!
//! Membership is mutated at runtime (add/remove member) concurrently
//! with `authorize` reads from in-flight executions. Both directions
//! of the membership mapping live under a single `RwLock`, so a reader
//! observes either the pre- or post-mutation state, never a torn one.

mod engine;
mod rule;
mod snapshot;
mod store;

pub use engine::AuthEngine;
pub use rule::PermissionRule;
pub use snapshot::GroupSnapshot;
pub use store::GroupStore;
