//! region-digraph: namespace isolation with filtered cross-namespace visibility
//!
//! Deployable modules are grouped into disjoint regions. By default a module
//! in one region cannot see a module or capability in another; administrators
//! punch holes in the isolation boundary with directed, filtered edges, and
//! every cross-region lookup is reduced to a filtered-reachability query over
//! that digraph.
//!
//! ## Architecture
//!
//! - `identity` / `candidate` : value types (module identities, capability refs)
//! - `filter`                 : per-edge admission (allow-set + capability predicate)
//! - `region`                 : lock-free membership domains
//! - `digraph`                : structural mutation with whole-topology invariants
//! - `snapshot` / `resolver`  : immutable topology copies + the visibility BFS
//! - `topology`               : declarative (serde) topology configuration
//!
//! ## Concurrency
//!
//! One mutex serializes structural mutation; membership reads and visibility
//! queries run against lock-free concurrent maps and immutable snapshots, so
//! the query hot path never contends with administrative changes.
//!
//! ## Usage
//!
//! ```rust
//! use region_digraph::{
//!     ModuleIdentity, Origin, RegionDigraph, RegionFilter, VisibilityResolver,
//! };
//!
//! let digraph = RegionDigraph::new();
//! digraph.create_region("app")?;
//! digraph.create_region("shared")?;
//!
//! let logging = ModuleIdentity::parse("logging@1.4.0")?;
//! digraph.add_module("shared", logging.clone())?;
//! digraph.connect(
//!     "app",
//!     "shared",
//!     RegionFilter::builder().allow(logging.clone()).build(),
//! )?;
//!
//! let snapshot = digraph.snapshot();
//! let origin = Origin::Region("app".to_string());
//! let visible = VisibilityResolver::filter(&snapshot, &origin, vec![logging.into()]);
//! assert_eq!(visible.len(), 1);
//! # Ok::<(), region_digraph::RegionError>(())
//! ```

pub mod candidate;
pub mod digraph;
pub mod error;
pub mod filter;
pub mod identity;
pub mod region;
pub mod resolver;
pub mod snapshot;
pub mod topology;

pub use candidate::{Candidate, CapabilityRef};
pub use digraph::RegionDigraph;
pub use error::{RegionError, Result};
pub use filter::{AttributeMatch, CapabilityPredicate, RegionFilter, RegionFilterBuilder};
pub use identity::ModuleIdentity;
pub use region::Region;
pub use resolver::{Origin, VisibilityResolver};
pub use snapshot::TopologySnapshot;
pub use topology::{EdgeConfig, RegionConfig, TopologyConfig};
