//! Module identity: the (name, version) key for deployable units
//!
//! Identities are immutable values used as membership keys and as filter
//! allow-list entries. Equality is exact (name, version); two deployments of
//! the same name at the same version are the same identity.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

/// Immutable (name, version) identity of a deployable module
///
/// # Examples
///
/// ```rust
/// use region_digraph::ModuleIdentity;
///
/// let id = ModuleIdentity::parse("auth-service@1.2.0").unwrap();
/// assert_eq!(id.name(), "auth-service");
/// assert_eq!(id.version().major, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIdentity {
    name: String,
    version: Version,
}

impl ModuleIdentity {
    /// Create a new identity
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Parse a `name@version` string (version is strict semver)
    pub fn parse(s: &str) -> Result<Self> {
        let (name, version) = s
            .rsplit_once('@')
            .ok_or_else(|| RegionError::InvalidIdentity(s.to_string()))?;
        if name.is_empty() {
            return Err(RegionError::InvalidIdentity(s.to_string()));
        }
        let version = Version::parse(version)
            .map_err(|_| RegionError::InvalidIdentity(s.to_string()))?;
        Ok(Self::new(name, version))
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module version
    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
