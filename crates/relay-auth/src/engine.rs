//! Authorization decisions over the group store.

use crate::{GroupStore, PermissionRule};
use relay_types::Principal;
use std::sync::Arc;

/// Decides allow/deny for command invocation and group mutation.
///
/// A pure function of the current [`GroupStore`] state: no side
/// effects, no caching. Cheap to clone (shares the store) and safe to
/// call concurrently from many in-flight executions.
///
/// # Example
///
/// ```
/// use relay_auth::{AuthEngine, GroupSnapshot, GroupStore, PermissionRule};
/// use std::sync::Arc;
///
/// let store = Arc::new(GroupStore::from_snapshot(
///     &GroupSnapshot::new().with_group("users", ["jane"]),
/// ));
/// let auth = AuthEngine::new(store);
///
/// let rule = PermissionRule::groups(["users"]);
/// assert!(auth.authorize(&"jane".into(), &rule));
/// assert!(!auth.authorize(&"mallory".into(), &rule));
/// ```
#[derive(Debug, Clone)]
pub struct AuthEngine {
    store: Arc<GroupStore>,
}

impl AuthEngine {
    /// Creates an engine over a shared store.
    #[must_use]
    pub fn new(store: Arc<GroupStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for administrative surfaces.
    #[must_use]
    pub fn store(&self) -> &Arc<GroupStore> {
        &self.store
    }

    /// Returns `true` if the principal satisfies the rule.
    ///
    /// Logical OR: direct membership in `allowed_users`, or membership
    /// in any group named by `allowed_groups`. An empty rule denies
    /// everyone.
    #[must_use]
    pub fn authorize(&self, principal: &Principal, rule: &PermissionRule) -> bool {
        if rule.allows_user(principal) {
            return true;
        }
        rule.allowed_groups
            .iter()
            .any(|group| self.store.is_member(group, principal))
    }

    /// Guard for group membership mutation.
    ///
    /// The transport layer must call this before invoking
    /// [`GroupStore::add_member`] / [`GroupStore::remove_member`] on
    /// behalf of an actor.
    #[must_use]
    pub fn authorize_group_mutation(&self, actor: &Principal) -> bool {
        self.store.is_group_admin(actor)
    }
}
