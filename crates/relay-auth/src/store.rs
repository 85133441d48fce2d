//! Thread-safe, in-memory group membership store.

use crate::GroupSnapshot;
use parking_lot::RwLock;
use relay_types::Principal;
use std::collections::{HashMap, HashSet};

/// Both directions of the membership mapping plus the admin set.
///
/// Kept in one struct so a single lock guards all three — an
/// `add_member` updates the forward and reverse maps under the same
/// write guard, and `authorize` readers can never observe a principal
/// present in a group's member set but missing from the reverse index.
#[derive(Debug, Default)]
struct Membership {
    /// Group name → member principals.
    groups: HashMap<String, HashSet<Principal>>,
    /// Principal → group names (derived, kept in lockstep).
    by_principal: HashMap<Principal, HashSet<String>>,
    /// Principals allowed to mutate membership.
    admins: HashSet<Principal>,
}

impl Membership {
    fn from_snapshot(snapshot: &GroupSnapshot) -> Self {
        let mut inner = Self::default();
        for (group, members) in &snapshot.groups {
            let entry = inner.groups.entry(group.clone()).or_default();
            for member in members {
                entry.insert(member.clone());
                inner
                    .by_principal
                    .entry(member.clone())
                    .or_default()
                    .insert(group.clone());
            }
        }
        inner.admins = snapshot.group_admins.iter().cloned().collect();
        inner
    }
}

/// In-memory group membership store.
///
/// Loaded once at startup from a [`GroupSnapshot`]; mutated at runtime
/// through [`add_member`](Self::add_member) /
/// [`remove_member`](Self::remove_member). Mutations are visible to
/// the very next read (read-after-write within the process). Durable
/// persistence is the bootstrap layer's concern — it can call
/// [`snapshot`](Self::snapshot) and flush the result.
///
/// # Thread Safety
///
/// All state sits behind one `parking_lot::RwLock`, giving concurrent
/// `authorize` readers snapshot-consistent views while an
/// administrative mutation is in flight.
///
/// # Example
///
/// ```
/// use relay_auth::{GroupSnapshot, GroupStore};
///
/// let store = GroupStore::from_snapshot(
///     &GroupSnapshot::new().with_group("users", ["jane"]),
/// );
///
/// assert!(store.is_member("users", &"jane".into()));
/// store.add_member("users", "bob".into());
/// assert_eq!(store.groups_of(&"bob".into()).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GroupStore {
    inner: RwLock<Membership>,
}

impl GroupStore {
    /// Creates an empty store (no groups, no admins).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a startup snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &GroupSnapshot) -> Self {
        Self {
            inner: RwLock::new(Membership::from_snapshot(snapshot)),
        }
    }

    /// Replaces the entire membership state atomically.
    ///
    /// This is the explicit hot-reload operation: readers see either
    /// the old state or the new one, never a mix.
    pub fn reload(&self, snapshot: &GroupSnapshot) {
        let next = Membership::from_snapshot(snapshot);
        *self.inner.write() = next;
        tracing::info!(groups = snapshot.groups.len(), "membership reloaded");
    }

    /// Ensures a group exists, creating it empty if needed.
    pub fn add_group(&self, group: &str) {
        self.inner.write().groups.entry(group.to_string()).or_default();
    }

    /// Adds a principal to a group, creating the group if needed.
    ///
    /// Idempotent: returns `false` if the principal was already a
    /// member.
    pub fn add_member(&self, group: &str, principal: Principal) -> bool {
        let mut inner = self.inner.write();
        let inserted = inner
            .groups
            .entry(group.to_string())
            .or_default()
            .insert(principal.clone());
        if inserted {
            inner
                .by_principal
                .entry(principal)
                .or_default()
                .insert(group.to_string());
        }
        inserted
    }

    /// Removes a principal from a group.
    ///
    /// Idempotent: removing a non-member (or from an unknown group) is
    /// a no-op returning `false`.
    pub fn remove_member(&self, group: &str, principal: &Principal) -> bool {
        let mut inner = self.inner.write();
        let removed = inner
            .groups
            .get_mut(group)
            .is_some_and(|members| members.remove(principal));
        if removed {
            if let Some(groups) = inner.by_principal.get_mut(principal) {
                groups.remove(group);
                if groups.is_empty() {
                    inner.by_principal.remove(principal);
                }
            }
        }
        removed
    }

    /// Returns the groups containing a principal.
    ///
    /// Empty set — never an error — for an unknown principal.
    #[must_use]
    pub fn groups_of(&self, principal: &Principal) -> HashSet<String> {
        self.inner
            .read()
            .by_principal
            .get(principal)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns `true` if the principal is a member of the group.
    #[must_use]
    pub fn is_member(&self, group: &str, principal: &Principal) -> bool {
        self.inner
            .read()
            .groups
            .get(group)
            .is_some_and(|members| members.contains(principal))
    }

    /// Returns `true` if the principal belongs to the group-admin set.
    #[must_use]
    pub fn is_group_admin(&self, principal: &Principal) -> bool {
        self.inner.read().admins.contains(principal)
    }

    /// Exports the current state for the persistence layer.
    #[must_use]
    pub fn snapshot(&self) -> GroupSnapshot {
        let inner = self.inner.read();
        let mut snapshot = GroupSnapshot::new();
        for (group, members) in &inner.groups {
            let mut sorted: Vec<Principal> = members.iter().cloned().collect();
            sorted.sort();
            snapshot.groups.insert(group.clone(), sorted);
        }
        let mut admins: Vec<Principal> = inner.admins.iter().cloned().collect();
        admins.sort();
        snapshot.group_admins = admins;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> GroupStore {
        GroupStore::from_snapshot(
            &GroupSnapshot::new()
                .with_group("users", ["jane", "bob"])
                .with_group("admin", ["root"])
                .with_admin("root"),
        )
    }

    #[test]
    fn snapshot_load_populates_both_directions() {
        let store = seeded();

        assert!(store.is_member("users", &"jane".into()));
        assert!(store.is_member("admin", &"root".into()));
        assert_eq!(store.groups_of(&"jane".into()), ["users".to_string()].into());
    }

    #[test]
    fn unknown_principal_has_empty_groups() {
        let store = seeded();
        assert!(store.groups_of(&"mallory".into()).is_empty());
        assert!(!store.is_member("users", &"mallory".into()));
    }

    #[test]
    fn add_member_creates_group_implicitly() {
        let store = GroupStore::new();
        assert!(store.add_member("ops", "jane".into()));
        assert!(store.is_member("ops", &"jane".into()));
    }

    #[test]
    fn add_member_is_idempotent() {
        let store = seeded();
        assert!(!store.add_member("users", "jane".into()));
        assert_eq!(store.groups_of(&"jane".into()).len(), 1);
    }

    #[test]
    fn remove_member_is_idempotent() {
        let store = seeded();
        assert!(store.remove_member("users", &"jane".into()));
        assert!(!store.remove_member("users", &"jane".into()));
        assert!(!store.remove_member("nonexistent", &"jane".into()));
    }

    #[test]
    fn add_then_remove_restores_prior_state() {
        let store = seeded();
        let before = store.groups_of(&"bob".into());

        store.add_member("admin", "bob".into());
        assert_eq!(store.groups_of(&"bob".into()).len(), 2);

        store.remove_member("admin", &"bob".into());
        assert_eq!(store.groups_of(&"bob".into()), before);
    }

    #[test]
    fn group_admin_set() {
        let store = seeded();
        assert!(store.is_group_admin(&"root".into()));
        assert!(!store.is_group_admin(&"jane".into()));
    }

    #[test]
    fn add_group_creates_empty_group() {
        let store = GroupStore::new();
        store.add_group("ops");
        // Present but empty: nobody is a member yet.
        assert!(!store.is_member("ops", &"jane".into()));
        assert!(store.snapshot().groups.contains_key("ops"));
    }

    #[test]
    fn snapshot_roundtrip() {
        let store = seeded();
        store.add_member("users", "carol".into());

        let exported = store.snapshot();
        let restored = GroupStore::from_snapshot(&exported);

        assert_eq!(restored.snapshot(), exported);
        assert!(restored.is_member("users", &"carol".into()));
    }

    #[test]
    fn reload_replaces_wholesale() {
        let store = seeded();
        store.reload(&GroupSnapshot::new().with_group("ops", ["carol"]));

        assert!(store.is_member("ops", &"carol".into()));
        assert!(!store.is_member("users", &"jane".into()));
        assert!(!store.is_group_admin(&"root".into()));
    }

    #[test]
    fn concurrent_mutation_and_reads() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(GroupStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let principal = Principal::new(format!("user-{i}"));
                    store.add_member("users", principal.clone());
                    // Reverse index must be consistent immediately.
                    assert!(store.groups_of(&principal).contains("users"));
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread panicked");
        }
        assert_eq!(store.snapshot().groups["users"].len(), 4);
    }
}
