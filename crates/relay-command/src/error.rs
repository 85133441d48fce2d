//! Registry errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`RegistryError::DuplicateCommand`] | `REGISTRY_DUPLICATE_COMMAND` | No |
//! | [`RegistryError::UnknownCommand`] | `REGISTRY_UNKNOWN_COMMAND` | No |

use relay_types::ErrorCode;
use thiserror::Error;

/// Command registry error.
///
/// # Example
///
/// ```
/// use relay_command::RegistryError;
/// use relay_types::ErrorCode;
///
/// let err = RegistryError::UnknownCommand("frobnicate".into());
/// assert_eq!(err.code(), "REGISTRY_UNKNOWN_COMMAND");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A command with this name is already registered.
    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    /// No command registered under this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl ErrorCode for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateCommand(_) => "REGISTRY_DUPLICATE_COMMAND",
            Self::UnknownCommand(_) => "REGISTRY_UNKNOWN_COMMAND",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Neither changes on retry: both need a code or catalog fix.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(
            &[
                RegistryError::DuplicateCommand("x".into()),
                RegistryError::UnknownCommand("x".into()),
            ],
            "REGISTRY_",
        );
    }

    #[test]
    fn messages_name_the_command() {
        assert!(RegistryError::DuplicateCommand("echo".into())
            .to_string()
            .contains("echo"));
        assert!(RegistryError::UnknownCommand("frobnicate".into())
            .to_string()
            .contains("frobnicate"));
    }
}
