//! Error types for region-digraph
//!
//! Every variant is a recoverable validation failure: a rejected mutation
//! leaves the digraph unchanged, and callers are expected to log and skip the
//! offending step rather than abort.

use thiserror::Error;

use crate::identity::ModuleIdentity;

/// Main error type for digraph mutations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegionError {
    /// A region with this name already exists
    #[error("region name already in use: {0}")]
    DuplicateNamespaceName(String),

    /// Mutation referenced a region that does not exist (or was removed)
    #[error("unknown region: {0}")]
    UnknownNamespace(String),

    /// Edges from a region to itself are forbidden
    #[error("cannot connect region '{0}' to itself")]
    SelfConnection(String),

    /// At most one edge per ordered (tail, head) pair; remove it first
    #[error("regions already connected: {tail} -> {head}")]
    AlreadyConnected { tail: String, head: String },

    /// The new edge's filter admits a module that is already a local member
    /// of the tail region, which would make it resolvable as both local and
    /// imported
    #[error("filter on new edge from '{region}' admits local member {module}")]
    FilterAdmitsLocalMember {
        region: String,
        module: ModuleIdentity,
    },

    /// The module is already a member of a different region
    #[error("module {module} is already a member of region '{owner}'")]
    AlreadyInAnotherNamespace {
        module: ModuleIdentity,
        owner: String,
    },

    /// The module is already a member of this region
    #[error("module {module} is already a member of region '{region}'")]
    DuplicateIdentity {
        module: ModuleIdentity,
        region: String,
    },

    /// An outgoing edge already declares this identity as imported, so adding
    /// it locally would be ambiguous
    #[error("module {module} is admitted by an existing edge to '{head}'")]
    HiddenByExistingEdge {
        module: ModuleIdentity,
        head: String,
    },

    /// A module identity string could not be parsed (`name@version`)
    #[error("invalid module identity: {0}")]
    InvalidIdentity(String),
}

/// Result type alias for digraph operations
pub type Result<T> = std::result::Result<T, RegionError>;
