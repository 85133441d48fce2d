//! Builtin commands shipped with the engine.
//!
//! Each builtin is exposed as a constructor returning a ready-to-register
//! [`relay_command::CommandDef`]; the bootstrap layer decides which ones
//! actually make it into the process registry.

mod countdown;
mod echo;

pub use countdown::countdown;
pub use echo::echo;
