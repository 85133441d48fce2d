//! Per-command permission rules.

use relay_types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Who may invoke a command: a set of principals OR a set of groups.
///
/// Evaluated as a logical OR by [`crate::AuthEngine::authorize`]. An
/// empty rule (no users, no groups) denies all callers — there is no
/// "public" sentinel, so access must always be granted explicitly.
///
/// # Example
///
/// ```
/// use relay_auth::PermissionRule;
///
/// let rule = PermissionRule::new()
///     .allow_user("jane")
///     .allow_group("admin");
///
/// assert!(rule.allows_user(&"jane".into()));
/// assert!(rule.names_group("admin"));
/// assert!(!PermissionRule::new().allows_user(&"jane".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    /// Principals allowed regardless of group membership.
    #[serde(default)]
    pub allowed_users: HashSet<Principal>,
    /// Groups whose members are allowed.
    #[serde(default)]
    pub allowed_groups: HashSet<String>,
}

impl PermissionRule {
    /// Creates an empty (deny-all) rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule from group names only.
    #[must_use]
    pub fn groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_users: HashSet::new(),
            allowed_groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a rule from principal identifiers only.
    #[must_use]
    pub fn users<I, P>(users: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Principal>,
    {
        Self {
            allowed_users: users.into_iter().map(Into::into).collect(),
            allowed_groups: HashSet::new(),
        }
    }

    /// Adds a principal to `allowed_users`.
    #[must_use]
    pub fn allow_user(mut self, user: impl Into<Principal>) -> Self {
        self.allowed_users.insert(user.into());
        self
    }

    /// Adds a group to `allowed_groups`.
    #[must_use]
    pub fn allow_group(mut self, group: impl Into<String>) -> Self {
        self.allowed_groups.insert(group.into());
        self
    }

    /// Returns `true` if the principal is named directly by this rule.
    #[must_use]
    pub fn allows_user(&self, principal: &Principal) -> bool {
        self.allowed_users.contains(principal)
    }

    /// Returns `true` if the group is named by this rule.
    #[must_use]
    pub fn names_group(&self, group: &str) -> bool {
        self.allowed_groups.contains(group)
    }

    /// Returns `true` if the rule denies everyone (both sets empty).
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        self.allowed_users.is_empty() && self.allowed_groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rule_denies_all() {
        let rule = PermissionRule::new();
        assert!(rule.is_deny_all());
        assert!(!rule.allows_user(&"jane".into()));
        assert!(!rule.names_group("users"));
    }

    #[test]
    fn builder_accumulates() {
        let rule = PermissionRule::new()
            .allow_user("jane")
            .allow_user("ops-bot")
            .allow_group("admin");

        assert!(!rule.is_deny_all());
        assert!(rule.allows_user(&"jane".into()));
        assert!(rule.allows_user(&"ops-bot".into()));
        assert!(!rule.allows_user(&"mallory".into()));
        assert!(rule.names_group("admin"));
    }

    #[test]
    fn groups_constructor() {
        let rule = PermissionRule::groups(["users", "admin"]);
        assert!(rule.names_group("users"));
        assert!(rule.names_group("admin"));
        assert!(rule.allowed_users.is_empty());
    }

    #[test]
    fn users_constructor() {
        let rule = PermissionRule::users(["jane"]);
        assert!(rule.allows_user(&"jane".into()));
        assert!(rule.allowed_groups.is_empty());
    }

    #[test]
    fn duplicate_inserts_are_idempotent() {
        let rule = PermissionRule::new().allow_group("users").allow_group("users");
        assert_eq!(rule.allowed_groups.len(), 1);
    }
}
