//! Regions: isolated membership domains for module identities
//!
//! A region holds the set of module identities it owns and answers
//! containment queries lock-free, so visibility checks on the hot path never
//! contend with administrative mutation. All mutation goes through
//! [`RegionDigraph`](crate::digraph::RegionDigraph), which validates against
//! the whole topology under its structural lock before committing here.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashSet;

use crate::identity::ModuleIdentity;

/// A named, isolated membership domain
///
/// Handed out as `Arc<Region>`; a caller holding a stale `Arc` after
/// [`remove_region`](crate::digraph::RegionDigraph::remove_region) observes
/// an empty, tombstoned region rather than corrupt state.
pub struct Region {
    name: String,
    members: DashSet<ModuleIdentity>,
    removed: AtomicBool,
}

impl Region {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: DashSet::new(),
            removed: AtomicBool::new(false),
        }
    }

    /// Region name (unique within its digraph)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lock-free containment check
    ///
    /// Safe to call concurrently with mutation; a racing add/remove is
    /// observed as either fully before or fully after this call.
    pub fn contains(&self, module: &ModuleIdentity) -> bool {
        self.members.contains(module)
    }

    /// Point-in-time copy of the member set
    pub fn members(&self) -> Vec<ModuleIdentity> {
        self.members.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether this region has been removed from its digraph
    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    // Mutation is digraph-internal: callers go through RegionDigraph so that
    // the whole-topology invariants are checked under the structural lock.

    pub(crate) fn insert_member(&self, module: ModuleIdentity) {
        self.members.insert(module);
    }

    pub(crate) fn remove_member(&self, module: &ModuleIdentity) -> bool {
        self.members.remove(module).is_some()
    }

    pub(crate) fn clear_members(&self) {
        self.members.clear();
    }

    pub(crate) fn mark_removed(&self) {
        self.removed.store(true, Ordering::Release);
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("name", &self.name)
            .field("members", &self.members.len())
            .field("removed", &self.is_removed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ModuleIdentity {
        ModuleIdentity::parse(s).unwrap()
    }

    #[test]
    fn test_contains_reflects_membership() {
        let region = Region::new("app");
        assert!(!region.contains(&id("m@1.0.0")));

        region.insert_member(id("m@1.0.0"));
        assert!(region.contains(&id("m@1.0.0")));
        assert_eq!(region.len(), 1);

        assert!(region.remove_member(&id("m@1.0.0")));
        assert!(!region.contains(&id("m@1.0.0")));
        assert!(region.is_empty());
    }

    #[test]
    fn test_remove_of_non_member_is_noop() {
        let region = Region::new("app");
        assert!(!region.remove_member(&id("m@1.0.0")));
    }

    #[test]
    fn test_tombstone_clears_and_flags() {
        let region = Region::new("app");
        region.insert_member(id("m@1.0.0"));
        region.mark_removed();
        region.clear_members();

        assert!(region.is_removed());
        assert!(!region.contains(&id("m@1.0.0")));
    }
}
