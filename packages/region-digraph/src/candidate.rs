//! Visibility candidates: the references tested by a query
//!
//! The reference a requester tries to see is either a module identity or a
//! capability published by a module. Both flow through the same filter and
//! resolver paths as one sum type, so edge admission and reachability are
//! written once instead of per reference kind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identity::ModuleIdentity;

/// A capability published by a module, carrying arbitrary attributes
///
/// For visibility purposes a capability is owned by the namespace of its
/// contributing module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRef {
    /// The module that published this capability
    pub owner: ModuleIdentity,
    /// Attribute bag matched by edge capability predicates
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl CapabilityRef {
    /// Create a capability with no attributes
    pub fn new(owner: ModuleIdentity) -> Self {
        Self {
            owner,
            attributes: Map::new(),
        }
    }

    /// Add an attribute (builder-style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A reference being tested for visibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Candidate {
    /// A module identity
    Module(ModuleIdentity),
    /// A published capability with attributes
    Capability(CapabilityRef),
}

impl Candidate {
    /// The module whose namespace owns this candidate
    pub fn owner(&self) -> &ModuleIdentity {
        match self {
            Candidate::Module(id) => id,
            Candidate::Capability(cap) => &cap.owner,
        }
    }
}

impl From<ModuleIdentity> for Candidate {
    fn from(id: ModuleIdentity) -> Self {
        Candidate::Module(id)
    }
}

impl From<CapabilityRef> for Candidate {
    fn from(cap: CapabilityRef) -> Self {
        Candidate::Capability(cap)
    }
}
