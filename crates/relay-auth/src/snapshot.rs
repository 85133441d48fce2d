//! Boundary data shape for group membership persistence.
//!
//! Relay does not parse config files itself; the bootstrap layer
//! deserializes whatever format it keeps on disk into a
//! [`GroupSnapshot`] and hands it to [`crate::GroupStore`]. The store
//! can export a snapshot back out for the persistence layer to flush.

use relay_types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable snapshot of group membership and the admin set.
///
/// Wire shape:
///
/// ```json
/// {
///   "groups": { "users": ["jane", "bob"], "admin": ["root"] },
///   "group_admins": ["root"]
/// }
/// ```
///
/// `BTreeMap` keeps exported snapshots stable across runs, which makes
/// diffs of the persisted file meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// Group name → member principals.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<Principal>>,
    /// Principals allowed to mutate group membership.
    #[serde(default)]
    pub group_admins: Vec<Principal>,
}

impl GroupSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group with its members. Replaces an existing entry.
    #[must_use]
    pub fn with_group<I, P>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Principal>,
    {
        self.groups
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a group admin.
    #[must_use]
    pub fn with_admin(mut self, admin: impl Into<Principal>) -> Self {
        self.group_admins.push(admin.into());
        self
    }
}
