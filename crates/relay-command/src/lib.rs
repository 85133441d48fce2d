//! Command definitions and the process-wide registry for Relay.
//!
//! A command is a named, schema-validated unit of remote work with an
//! authorization rule:
//!
//! ```text
//! CommandDef
//!   ├── name, description        (discovery surface)
//!   ├── ParamSchema              (ordered, typed, required/optional)
//!   ├── PermissionRule           (allowed_users OR allowed_groups)
//!   └── Arc<dyn Runnable>        (the executable unit)
//! ```
//!
//! Command authors implement [`Runnable`]: receive validated
//! [`Params`], emit intermediate `running` events through
//! [`ExecContext`], and return an [`Outcome`] (or [`RunError`]) from
//! which the engine synthesizes the single terminal event.
//!
//! # Registration
//!
//! Registration is an explicit call made during process composition —
//! no import-time side effects, no global mutable state. Once the
//! composed registry is wrapped in an `Arc` and handed to the engine,
//! it is immutable for the process lifetime.
//!
//! ```
//! use relay_command::{CommandDef, CommandRegistry, FieldType, Outcome, ParamSchema,
//!                     Params, Runnable, RunError, ExecContext};
//! use relay_auth::PermissionRule;
//! use std::sync::Arc;
//!
//! struct Noop;
//!
//! #[async_trait::async_trait]
//! impl Runnable for Noop {
//!     async fn run(&self, _params: Params, _ctx: &ExecContext) -> Result<Outcome, RunError> {
//!         Ok(Outcome::new("done"))
//!     }
//! }
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(CommandDef::new(
//!     "noop",
//!     "Does nothing",
//!     ParamSchema::new(),
//!     PermissionRule::groups(["users"]),
//!     Arc::new(Noop),
//! ))?;
//! let registry = Arc::new(registry); // immutable from here on
//! # Ok::<(), relay_command::RegistryError>(())
//! ```

mod context;
mod definition;
mod error;
mod registry;
mod runnable;
mod schema;

pub use context::{Cancelled, ExecContext};
pub use definition::CommandDef;
pub use error::RegistryError;
pub use registry::CommandRegistry;
pub use runnable::{Outcome, RunError, Runnable};
pub use schema::{FieldSpec, FieldType, ParamSchema, Params, ParamViolations, Violation};
