//! Process-wide command catalog.

use crate::{CommandDef, RegistryError};
use relay_auth::AuthEngine;
use relay_types::Principal;
use std::collections::HashMap;
use std::sync::Arc;

/// Catalog mapping command names to their definitions.
///
/// Populated by explicit [`register`](Self::register) calls during
/// startup composition, then shared as `Arc<CommandRegistry>` —
/// immutability after init falls out of ownership, and there is no
/// unregister.
///
/// [`list`](Self::list) iterates in registration order so discovery
/// output is stable across repeated calls for a fixed catalog and
/// membership state.
pub struct CommandRegistry {
    /// Definitions in registration order (drives deterministic listing).
    commands: Vec<Arc<CommandDef>>,
    /// Name → index into `commands`.
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Adds a command definition to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateCommand`] if the name is
    /// already registered.
    pub fn register(&mut self, def: CommandDef) -> Result<(), RegistryError> {
        let name = def.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateCommand(name));
        }
        tracing::debug!(command = %name, "command registered");
        self.index.insert(name, self.commands.len());
        self.commands.push(Arc::new(def));
        Ok(())
    }

    /// Looks up a command by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCommand`] if no command is
    /// registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<CommandDef>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.commands[i]))
            .ok_or_else(|| RegistryError::UnknownCommand(name.to_string()))
    }

    /// Returns `true` if a command is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Lists the commands the principal is currently authorized to
    /// invoke, in registration order.
    ///
    /// Used for discovery/help output; deterministic for a fixed
    /// catalog and membership state.
    #[must_use]
    pub fn list(&self, principal: &Principal, auth: &AuthEngine) -> Vec<Arc<CommandDef>> {
        self.commands
            .iter()
            .filter(|def| auth.authorize(principal, def.permission()))
            .cloned()
            .collect()
    }

    /// All definitions, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandDef>> {
        self.commands.iter()
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.index.len())
            .finish()
    }
}
