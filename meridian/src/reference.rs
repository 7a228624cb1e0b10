//! Opaque spatial reference system identity.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identity of a spatial reference system.
///
/// The kernel never interprets a reference system: it only compares them for equality, e.g. to reject a hole that was
/// created in a different reference system than its polygon. Two reference systems are equal if they have the same
/// authority and code. The name is only used for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSystem {
    authority: String,
    code: String,
    name: String,
}

impl ReferenceSystem {
    /// WGS 84 geographic reference system.
    pub fn wgs84() -> Self {
        Self::new("EPSG", "4326", "WGS 84")
    }

    /// Web Mercator projected reference system.
    pub fn web_mercator() -> Self {
        Self::new("EPSG", "3857", "WGS 84 / Pseudo-Mercator")
    }

    /// Creates a new reference system identity.
    pub fn new(
        authority: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            authority: authority.into(),
            code: code.into(),
            name: name.into(),
        }
    }

    /// Reference system with the given EPSG code.
    pub fn epsg(code: u32) -> Self {
        Self::new("EPSG", code.to_string(), format!("EPSG:{code}"))
    }

    /// Authority that defines the reference system.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Code of the reference system within its authority.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ReferenceSystem {
    fn eq(&self, other: &Self) -> bool {
        self.authority == other.authority && self.code == other.code
    }
}

impl Eq for ReferenceSystem {}

impl Hash for ReferenceSystem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.authority.hash(state);
        self.code.hash(state);
    }
}

impl Display for ReferenceSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// Renders an optional reference system for diagnostics.
pub(crate) fn describe(reference_system: Option<&ReferenceSystem>) -> String {
    reference_system
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equality_is_by_identity() {
        assert_eq!(ReferenceSystem::epsg(4326), ReferenceSystem::wgs84());
        assert_ne!(ReferenceSystem::epsg(4326).name(), ReferenceSystem::wgs84().name());
        assert_ne!(ReferenceSystem::wgs84(), ReferenceSystem::web_mercator());
        assert_ne!(
            ReferenceSystem::new("OGC", "4326", "WGS 84"),
            ReferenceSystem::wgs84()
        );

        let set: HashSet<_> = [ReferenceSystem::wgs84(), ReferenceSystem::epsg(4326)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display() {
        assert_eq!(ReferenceSystem::web_mercator().to_string(), "EPSG:3857");
        assert_eq!(describe(None), "none");
        assert_eq!(describe(Some(&ReferenceSystem::wgs84())), "EPSG:4326");
    }
}
