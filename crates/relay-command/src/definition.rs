//! Command definitions: metadata plus the executable unit.

use crate::{ParamSchema, Runnable};
use relay_auth::PermissionRule;
use std::sync::Arc;

/// A named, schema-validated unit of remote work with an authorization
/// rule.
///
/// Created during startup composition and immutable thereafter; the
/// registry hands out `Arc<CommandDef>` clones for the process
/// lifetime. The name is the stable lookup key.
#[derive(Clone)]
pub struct CommandDef {
    name: String,
    description: String,
    schema: ParamSchema,
    permission: PermissionRule,
    runnable: Arc<dyn Runnable>,
}

impl CommandDef {
    /// Creates a command definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ParamSchema,
        permission: PermissionRule,
        runnable: Arc<dyn Runnable>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            permission,
            runnable,
        }
    }

    /// Unique command name (registry key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description for discovery output.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter schema for validation and discovery.
    #[must_use]
    pub fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    /// Who may invoke this command.
    #[must_use]
    pub fn permission(&self) -> &PermissionRule {
        &self.permission
    }

    /// The executable unit.
    #[must_use]
    pub fn runnable(&self) -> Arc<dyn Runnable> {
        Arc::clone(&self.runnable)
    }
}

impl std::fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}
