//! Declarative topology configuration
//!
//! Lifecycle engines rebuild the region topology from their own
//! configuration on every process start; this module is the config-shaped
//! entry point for that. A `TopologyConfig` deserializes from JSON (or any
//! serde format), validates fully before any side effect, and then applies
//! onto a digraph through the same mutation protocol as the programmatic
//! API, so every invariant check still runs.

use serde::{Deserialize, Serialize};

use crate::digraph::RegionDigraph;
use crate::error::{RegionError, Result};
use crate::filter::{AttributeMatch, RegionFilter};
use crate::identity::ModuleIdentity;

/// One region and its initial members (`name@version` strings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// One directed edge with its admission rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub tail: String,
    pub head: String,
    /// Module identities admitted across this edge (`name@version`)
    #[serde(default)]
    pub allow: Vec<String>,
    /// Capability attribute matcher; absent means no capability passes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_match: Option<AttributeMatch>,
}

/// Full declarative topology: regions, memberships, and edges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
}

impl TopologyConfig {
    /// Validate without side effects
    ///
    /// Checks region name uniqueness, edge endpoints, self-edges, and that
    /// every identity string parses. Cross-topology conflicts (membership
    /// exclusivity, edge/member ambiguity) are enforced by the digraph during
    /// [`apply`](Self::apply).
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for region in &self.regions {
            if region.name.is_empty() {
                return Err(RegionError::UnknownNamespace(String::new()));
            }
            if !seen.insert(region.name.as_str()) {
                return Err(RegionError::DuplicateNamespaceName(region.name.clone()));
            }
            for member in &region.members {
                ModuleIdentity::parse(member)?;
            }
        }
        for edge in &self.edges {
            if edge.tail == edge.head {
                return Err(RegionError::SelfConnection(edge.tail.clone()));
            }
            for endpoint in [&edge.tail, &edge.head] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(RegionError::UnknownNamespace(endpoint.clone()));
                }
            }
            for allowed in &edge.allow {
                ModuleIdentity::parse(allowed)?;
            }
        }
        Ok(())
    }

    /// Apply onto an existing digraph
    ///
    /// Regions are created first, then members added, then edges connected,
    /// so connect-time validation sees the final memberships. Stops at the
    /// first conflict; already-applied steps remain committed.
    pub fn apply(&self, digraph: &RegionDigraph) -> Result<()> {
        self.validate()?;

        for region in &self.regions {
            digraph.create_region(region.name.clone())?;
        }
        for region in &self.regions {
            for member in &region.members {
                digraph.add_module(&region.name, ModuleIdentity::parse(member)?)?;
            }
        }
        for edge in &self.edges {
            let mut builder = RegionFilter::builder();
            for allowed in &edge.allow {
                builder = builder.allow(ModuleIdentity::parse(allowed)?);
            }
            if let Some(matcher) = &edge.capability_match {
                builder = builder.capability_match(matcher.clone());
            }
            digraph.connect(&edge.tail, &edge.head, builder.build())?;
        }
        Ok(())
    }

    /// Build a fresh digraph from this configuration
    pub fn build(&self) -> Result<RegionDigraph> {
        let digraph = RegionDigraph::new();
        self.apply(&digraph)?;
        Ok(digraph)
    }
}
