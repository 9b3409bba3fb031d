//! The region digraph: regions, filtered edges, and the mutation protocol
//!
//! One digraph is the sole owner of its regions and edges. Structural
//! mutation (create/remove region, connect/disconnect, add/remove module) is
//! serialized by a single mutex so no mutation interleaves with another;
//! lookups and membership reads run against lock-free concurrent maps and
//! never take that mutex. Every mutation validates fully before committing
//! and leaves the digraph unchanged on error.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{RegionError, Result};
use crate::filter::RegionFilter;
use crate::identity::ModuleIdentity;
use crate::region::Region;
use crate::snapshot::TopologySnapshot;

/// Ordered (tail, head) edge key
type EdgeKey = (String, String);

/// Directed graph of regions with filtered visibility edges
///
/// # Examples
///
/// ```rust
/// use region_digraph::{ModuleIdentity, RegionDigraph, RegionFilter};
///
/// let digraph = RegionDigraph::new();
/// digraph.create_region("app").unwrap();
/// digraph.create_region("shared").unwrap();
///
/// let logging = ModuleIdentity::parse("logging@1.0.0").unwrap();
/// digraph.add_module("shared", logging.clone()).unwrap();
///
/// let filter = RegionFilter::builder().allow(logging).build();
/// digraph.connect("app", "shared", filter).unwrap();
/// ```
pub struct RegionDigraph {
    /// Region name -> region (read-hot, lock-free)
    regions: DashMap<String, Arc<Region>>,
    /// (tail, head) -> filter; at most one edge per ordered pair
    edges: DashMap<EdgeKey, Arc<RegionFilter>>,
    /// Reverse index: module -> owning region name, kept transactionally in
    /// step with region member sets for O(1) owner lookup
    owners: DashMap<ModuleIdentity, String>,
    /// Serializes all structural mutation; reads never take it
    mutation: Mutex<()>,
}

impl RegionDigraph {
    pub fn new() -> Self {
        Self {
            regions: DashMap::new(),
            edges: DashMap::new(),
            owners: DashMap::new(),
            mutation: Mutex::new(()),
        }
    }

    /// Create a new, empty region
    ///
    /// Fails with [`RegionError::DuplicateNamespaceName`] if the name is
    /// already in use.
    pub fn create_region(&self, name: impl Into<String>) -> Result<Arc<Region>> {
        let name = name.into();
        let _guard = self.mutation.lock();

        if self.regions.contains_key(&name) {
            warn!(region = %name, "rejected create_region: duplicate name");
            return Err(RegionError::DuplicateNamespaceName(name));
        }

        let region = Arc::new(Region::new(name.clone()));
        self.regions.insert(name.clone(), Arc::clone(&region));
        debug!(region = %name, "created region");
        Ok(region)
    }

    /// Connect `tail` to `head` with an admission filter
    ///
    /// The edge grants `tail` visibility into `head`, subject to the filter.
    /// Rejects self-connections, duplicate edges, unknown regions, and
    /// filters that admit an identity already local to `tail` (which would
    /// make that module resolvable as both local and imported).
    pub fn connect(&self, tail: &str, head: &str, filter: RegionFilter) -> Result<()> {
        let _guard = self.mutation.lock();

        if tail == head {
            warn!(region = %tail, "rejected connect: self-connection");
            return Err(RegionError::SelfConnection(tail.to_string()));
        }
        let tail_region = self
            .regions
            .get(tail)
            .map(|entry| Arc::clone(&entry))
            .ok_or_else(|| RegionError::UnknownNamespace(tail.to_string()))?;
        if !self.regions.contains_key(head) {
            return Err(RegionError::UnknownNamespace(head.to_string()));
        }

        let key = (tail.to_string(), head.to_string());
        if self.edges.contains_key(&key) {
            warn!(tail, head, "rejected connect: already connected");
            return Err(RegionError::AlreadyConnected {
                tail: tail.to_string(),
                head: head.to_string(),
            });
        }

        if let Some(local) = filter
            .allowed_modules()
            .find(|module| tail_region.contains(module))
        {
            warn!(tail, head, module = %local, "rejected connect: filter admits local member");
            return Err(RegionError::FilterAdmitsLocalMember {
                region: tail.to_string(),
                module: local.clone(),
            });
        }

        self.edges.insert(key, Arc::new(filter));
        debug!(tail, head, "connected regions");
        Ok(())
    }

    /// Remove the ordered edge `tail -> head`; returns whether it existed
    pub fn disconnect(&self, tail: &str, head: &str) -> bool {
        let _guard = self.mutation.lock();
        let removed = self
            .edges
            .remove(&(tail.to_string(), head.to_string()))
            .is_some();
        if removed {
            debug!(tail, head, "disconnected regions");
        }
        removed
    }

    /// Add a module identity to a region
    ///
    /// Validation order: region must exist; the identity must not be owned by
    /// another region, nor already be a member here, nor be admitted by any
    /// existing outgoing edge of this region. All checks and the commit run
    /// under the one structural lock.
    pub fn add_module(&self, region_name: &str, module: ModuleIdentity) -> Result<()> {
        let _guard = self.mutation.lock();

        let region = self
            .regions
            .get(region_name)
            .map(|entry| Arc::clone(&entry))
            .ok_or_else(|| RegionError::UnknownNamespace(region_name.to_string()))?;

        if let Some(owner) = self.owners.get(&module) {
            let err = if owner.value() == region_name {
                RegionError::DuplicateIdentity {
                    module: module.clone(),
                    region: region_name.to_string(),
                }
            } else {
                RegionError::AlreadyInAnotherNamespace {
                    module: module.clone(),
                    owner: owner.value().clone(),
                }
            };
            warn!(region = region_name, module = %module, %err, "rejected add_module");
            return Err(err);
        }

        // An outgoing edge already declaring this identity as imported would
        // make the same module resolvable as local and imported at once.
        for entry in self.edges.iter() {
            let (tail, head) = entry.key();
            if tail == region_name && entry.value().admits_module(&module) {
                warn!(region = region_name, module = %module, head = %head,
                      "rejected add_module: hidden by existing edge");
                return Err(RegionError::HiddenByExistingEdge {
                    module,
                    head: head.clone(),
                });
            }
        }

        region.insert_member(module.clone());
        self.owners.insert(module.clone(), region_name.to_string());
        debug!(region = region_name, module = %module, "added module");
        Ok(())
    }

    /// Remove a module from a region; removing a non-member is a no-op
    pub fn remove_module(&self, region_name: &str, module: &ModuleIdentity) -> bool {
        let _guard = self.mutation.lock();

        let Some(region) = self.regions.get(region_name).map(|entry| Arc::clone(&entry)) else {
            return false;
        };
        if !region.remove_member(module) {
            return false;
        }
        self.owners
            .remove_if(module, |_, owner| owner == region_name);
        debug!(region = region_name, module = %module, "removed module");
        true
    }

    /// Remove a region, all edges touching it, and its members
    ///
    /// Evicted members return to "unowned": no origin will see them until
    /// they are added somewhere again. Stale `Arc<Region>` handles observe an
    /// empty, tombstoned region.
    pub fn remove_region(&self, name: &str) -> bool {
        let _guard = self.mutation.lock();

        let Some((_, region)) = self.regions.remove(name) else {
            return false;
        };
        for module in region.members() {
            self.owners.remove_if(&module, |_, owner| owner == name);
        }
        region.clear_members();
        region.mark_removed();
        self.edges
            .retain(|(tail, head), _| tail != name && head != name);
        debug!(region = name, "removed region");
        true
    }

    /// Look up a region by name
    pub fn region(&self, name: &str) -> Option<Arc<Region>> {
        self.regions.get(name).map(|entry| Arc::clone(&entry))
    }

    /// The region owning a module identity, if any (O(1) via reverse index)
    pub fn namespace_of(&self, module: &ModuleIdentity) -> Option<Arc<Region>> {
        let owner = self.owners.get(module)?.value().clone();
        self.region(&owner)
    }

    /// Outgoing edges of `tail` as (head, filter) pairs
    pub fn edges_from(&self, tail: &str) -> Vec<(String, Arc<RegionFilter>)> {
        self.edges
            .iter()
            .filter(|entry| entry.key().0 == tail)
            .map(|entry| (entry.key().1.clone(), Arc::clone(entry.value())))
            .collect()
    }

    /// Stable snapshot of all regions
    ///
    /// Taken under the structural lock: iterating the returned vector never
    /// observes later mutation and never fails on concurrent modification.
    pub fn regions(&self) -> Vec<Arc<Region>> {
        let _guard = self.mutation.lock();
        self.regions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Immutable topology snapshot for visibility queries
    ///
    /// Copied from the lock-free maps without taking the structural lock, so
    /// queries never contend with mutation; traversal then runs against the
    /// copy without holding any lock.
    pub fn snapshot(&self) -> TopologySnapshot {
        let mut snapshot = TopologySnapshot::default();
        for entry in self.regions.iter() {
            snapshot.add_region(entry.key().clone());
        }
        for entry in self.edges.iter() {
            let (tail, head) = entry.key();
            snapshot.add_edge(tail.clone(), head.clone(), Arc::clone(entry.value()));
        }
        for entry in self.owners.iter() {
            snapshot.add_owner(entry.key().clone(), entry.value().clone());
        }
        snapshot
    }
}

impl Default for RegionDigraph {
    fn default() -> Self {
        Self::new()
    }
}
