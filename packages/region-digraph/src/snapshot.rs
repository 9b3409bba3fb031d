//! Immutable topology snapshots consumed by visibility queries
//!
//! A snapshot is copied once from the digraph's concurrent maps and then
//! queried many times without any lock, so traversal never blocks mutation
//! and mutation never invalidates an in-flight query.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::filter::RegionFilter;
use crate::identity::ModuleIdentity;

/// Point-in-time copy of region names, adjacency, and module ownership
#[derive(Debug, Clone, Default)]
pub struct TopologySnapshot {
    regions: HashSet<String>,
    /// tail -> [(head, filter)]
    edges: HashMap<String, Vec<(String, Arc<RegionFilter>)>>,
    owners: HashMap<ModuleIdentity, String>,
}

impl TopologySnapshot {
    pub(crate) fn add_region(&mut self, name: String) {
        self.regions.insert(name);
    }

    pub(crate) fn add_edge(&mut self, tail: String, head: String, filter: Arc<RegionFilter>) {
        self.edges.entry(tail).or_default().push((head, filter));
    }

    pub(crate) fn add_owner(&mut self, module: ModuleIdentity, region: String) {
        self.owners.insert(module, region);
    }

    /// Whether the snapshot contains a region of this name
    pub fn contains_region(&self, name: &str) -> bool {
        self.regions.contains(name)
    }

    /// Owning region of a module identity at snapshot time
    pub fn owner_of(&self, module: &ModuleIdentity) -> Option<&str> {
        self.owners.get(module).map(String::as_str)
    }

    /// Outgoing edges of `tail` at snapshot time
    pub fn out_edges(&self, tail: &str) -> &[(String, Arc<RegionFilter>)] {
        self.edges.get(tail).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of regions in the snapshot
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}
