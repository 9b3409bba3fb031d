//! Visibility resolution: filtered reachability over a topology snapshot
//!
//! Answers "may this origin see this candidate?" by breadth-first search over
//! the snapshot's edges, where an edge is traversable only if its filter
//! admits the exact candidate under test. Admission at one hop never implies
//! admission at the next; a candidate is visible iff some path to its owning
//! region admits it at every hop. A per-query visited set bounds traversal,
//! so cyclic topologies always terminate.
//!
//! The resolver never errors: an unresolvable origin or candidate is simply
//! not visible. Failing open here would be an isolation regression.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::candidate::Candidate;
use crate::filter::RegionFilter;
use crate::identity::ModuleIdentity;
use crate::snapshot::TopologySnapshot;

/// The requesting side of a visibility query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The underlying system context; exempt from isolation, sees everything
    Root,
    /// A request issued from a region, by name
    Region(String),
    /// A request issued by a module, resolved through its owning region
    Module(ModuleIdentity),
}

/// Stateless visibility algorithm over a [`TopologySnapshot`]
pub struct VisibilityResolver;

impl VisibilityResolver {
    /// Whether `candidate` is visible to `origin`
    pub fn is_visible(
        snapshot: &TopologySnapshot,
        origin: &Origin,
        candidate: &Candidate,
    ) -> bool {
        let origin_region = match Self::resolve_origin(snapshot, origin) {
            OriginResolution::Root => return true,
            OriginResolution::Unowned => return false,
            OriginResolution::Region(name) => name,
        };

        let Some(target) = snapshot.owner_of(candidate.owner()) else {
            // Unowned candidates are invisible from every non-root origin.
            return false;
        };
        if target == origin_region {
            // Same-namespace visibility is unconditional and filter-independent.
            return true;
        }

        Self::reachable_through_admitting_path(snapshot, origin_region, target, candidate)
    }

    /// Batch form: the order-preserving visible subset of `candidates`
    pub fn filter(
        snapshot: &TopologySnapshot,
        origin: &Origin,
        candidates: Vec<Candidate>,
    ) -> Vec<Candidate> {
        if matches!(Self::resolve_origin(snapshot, origin), OriginResolution::Root) {
            return candidates;
        }

        let total = candidates.len();
        #[cfg(feature = "parallel")]
        let visible: Vec<Candidate> = candidates
            .into_par_iter()
            .filter(|candidate| Self::is_visible(snapshot, origin, candidate))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let visible: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| Self::is_visible(snapshot, origin, candidate))
            .collect();

        trace!(?origin, total, visible = visible.len(), "visibility filter");
        visible
    }

    fn resolve_origin<'a>(
        snapshot: &'a TopologySnapshot,
        origin: &'a Origin,
    ) -> OriginResolution<'a> {
        match origin {
            Origin::Root => OriginResolution::Root,
            Origin::Region(name) => {
                if snapshot.contains_region(name) {
                    OriginResolution::Region(name)
                } else {
                    OriginResolution::Unowned
                }
            }
            Origin::Module(module) => match snapshot.owner_of(module) {
                Some(region) => OriginResolution::Region(region),
                None => OriginResolution::Unowned,
            },
        }
    }

    /// BFS from `origin` toward `target`; an edge is usable only if its
    /// filter admits this exact candidate
    fn reachable_through_admitting_path(
        snapshot: &TopologySnapshot,
        origin: &str,
        target: &str,
        candidate: &Candidate,
    ) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(origin);
        let mut frontier: VecDeque<&(String, Arc<RegionFilter>)> =
            snapshot.out_edges(origin).iter().collect();

        while let Some((head, filter)) = frontier.pop_front() {
            if !filter.admits(candidate) {
                continue;
            }
            if head == target {
                return true;
            }
            if visited.insert(head) {
                frontier.extend(snapshot.out_edges(head));
            }
        }
        false
    }
}

enum OriginResolution<'a> {
    Root,
    Region(&'a str),
    Unowned,
}
