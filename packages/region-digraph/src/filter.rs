//! Edge filters: per-edge admission of modules and capabilities
//!
//! A filter is attached to a directed edge and decides, per candidate,
//! whether that edge may be traversed. Modules are admitted by an explicit
//! allow-set of exact identities; capabilities by an optional predicate over
//! their attribute bag. An empty filter is legal and admits nothing (a fully
//! closed edge). Filters are immutable once built; replacing one means
//! disconnecting and reconnecting the edge.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::candidate::Candidate;
use crate::identity::ModuleIdentity;

/// Predicate over a capability's attribute bag
pub type CapabilityPredicate = Arc<dyn Fn(&Map<String, Value>) -> bool + Send + Sync>;

/// Immutable admission filter attached to a visibility edge
#[derive(Clone, Default)]
pub struct RegionFilter {
    allowed: HashSet<ModuleIdentity>,
    capability_predicate: Option<CapabilityPredicate>,
}

impl RegionFilter {
    /// Start building a filter (admits nothing until populated)
    pub fn builder() -> RegionFilterBuilder {
        RegionFilterBuilder::default()
    }

    /// A filter admitting nothing
    pub fn closed() -> Self {
        Self::default()
    }

    /// Exact-identity module admission
    pub fn admits_module(&self, module: &ModuleIdentity) -> bool {
        self.allowed.contains(module)
    }

    /// Capability admission; no predicate means no capability passes
    pub fn admits_capability(&self, attributes: &Map<String, Value>) -> bool {
        match &self.capability_predicate {
            Some(predicate) => predicate(attributes),
            None => false,
        }
    }

    /// Admission for either candidate kind
    pub fn admits(&self, candidate: &Candidate) -> bool {
        match candidate {
            Candidate::Module(id) => self.admits_module(id),
            Candidate::Capability(cap) => self.admits_capability(&cap.attributes),
        }
    }

    /// Identities in the allow-set (used by connect-time validation)
    pub fn allowed_modules(&self) -> impl Iterator<Item = &ModuleIdentity> {
        self.allowed.iter()
    }

    /// Whether the filter has a capability predicate
    pub fn has_capability_predicate(&self) -> bool {
        self.capability_predicate.is_some()
    }
}

impl fmt::Debug for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionFilter")
            .field("allowed", &self.allowed)
            .field(
                "capability_predicate",
                &self.capability_predicate.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

/// Builder for [`RegionFilter`]
#[derive(Default)]
pub struct RegionFilterBuilder {
    allowed: HashSet<ModuleIdentity>,
    capability_predicate: Option<CapabilityPredicate>,
}

impl RegionFilterBuilder {
    /// Admit one module identity
    pub fn allow(mut self, module: ModuleIdentity) -> Self {
        self.allowed.insert(module);
        self
    }

    /// Admit every identity in the iterator
    pub fn allow_all(mut self, modules: impl IntoIterator<Item = ModuleIdentity>) -> Self {
        self.allowed.extend(modules);
        self
    }

    /// Set the capability predicate
    pub fn capability_predicate(
        mut self,
        predicate: impl Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.capability_predicate = Some(Arc::new(predicate));
        self
    }

    /// Set the capability predicate from a declarative matcher
    pub fn capability_match(mut self, matcher: AttributeMatch) -> Self {
        self.capability_predicate = Some(matcher.into_predicate());
        self
    }

    pub fn build(self) -> RegionFilter {
        RegionFilter {
            allowed: self.allowed,
            capability_predicate: self.capability_predicate,
        }
    }
}

/// Declarative capability matcher: every listed key must equal its value
///
/// This is the serde-friendly form used by topology configuration; it
/// compiles into the same predicate slot an opaque closure would fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeMatch {
    #[serde(flatten)]
    pub equals: BTreeMap<String, Value>,
}

impl AttributeMatch {
    /// Require `key == value`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.insert(key.into(), value.into());
        self
    }

    /// Compile into a capability predicate
    pub fn into_predicate(self) -> CapabilityPredicate {
        Arc::new(move |attributes| {
            self.equals
                .iter()
                .all(|(key, expected)| attributes.get(key) == Some(expected))
        })
    }
}
