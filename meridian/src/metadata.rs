//! Metadata attached to geometries and the factory contract that produces it.

use std::collections::BTreeMap;
use std::sync::Arc;

use meridian_types::PrecisionModel;
use serde::{Deserialize, Serialize};

use crate::factory::{Contract, Factory, FactoryTable};
use crate::reference::ReferenceSystem;

/// String-keyed metadata container.
///
/// Entries are kept ordered by key, so enumeration and comparison are deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under the key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores the value under the key, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes the value stored under the key.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Returns true if a value is stored under the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Factory contract producing [`Metadata`] for geometries.
pub trait MetadataFactory: Factory {
    /// Creates empty metadata.
    fn create_metadata(&self) -> Metadata;

    /// Creates metadata holding a copy of every entry of `source`.
    fn create_metadata_from(&self, source: &Metadata) -> Metadata;
}

impl Contract for dyn MetadataFactory {
    const NAME: &'static str = "MetadataFactory";

    fn product_types() -> Vec<std::any::TypeId> {
        vec![std::any::TypeId::of::<Metadata>()]
    }

    fn factories(instance: &Self) -> &FactoryTable {
        instance.factories()
    }
}

/// Metadata factory that copies entries verbatim.
#[derive(Debug)]
pub struct DefaultMetadataFactory {
    precision_model: Arc<PrecisionModel>,
    reference_system: Option<ReferenceSystem>,
    factories: FactoryTable,
}

impl DefaultMetadataFactory {
    /// Creates a new factory bound to the precision model and reference system.
    pub fn new(
        precision_model: Arc<PrecisionModel>,
        reference_system: Option<ReferenceSystem>,
    ) -> Self {
        Self {
            precision_model,
            reference_system,
            factories: FactoryTable::default(),
        }
    }
}

impl Default for DefaultMetadataFactory {
    fn default() -> Self {
        Self::new(PrecisionModel::shared_default(), None)
    }
}

impl Factory for DefaultMetadataFactory {
    fn precision_model(&self) -> &Arc<PrecisionModel> {
        &self.precision_model
    }

    fn reference_system(&self) -> Option<&ReferenceSystem> {
        self.reference_system.as_ref()
    }

    fn factories(&self) -> &FactoryTable {
        &self.factories
    }
}

impl MetadataFactory for DefaultMetadataFactory {
    fn create_metadata(&self) -> Metadata {
        Metadata::new()
    }

    fn create_metadata_from(&self, source: &Metadata) -> Metadata {
        source.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_access() {
        let mut metadata = Metadata::new();
        assert!(metadata.is_empty());
        assert_eq!(metadata.set("name", "river"), None);
        assert_eq!(metadata.set("name", "lake"), Some("river".to_string()));
        metadata.set("source", "survey");

        assert_eq!(metadata.get("name"), Some("lake"));
        assert_eq!(metadata.len(), 2);
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            vec![("name", "lake"), ("source", "survey")]
        );

        assert_eq!(metadata.remove("name"), Some("lake".to_string()));
        assert!(!metadata.contains_key("name"));
    }

    #[test]
    fn default_factory_copies_entries() {
        let factory = DefaultMetadataFactory::default();
        let source: Metadata = [("a", "1"), ("b", "2")].into_iter().collect();

        let copy = factory.create_metadata_from(&source);
        assert_eq!(copy, source);
        assert!(factory.create_metadata().is_empty());
        assert!(factory.factories().is_empty());
    }

    #[test]
    fn serializes_as_map() {
        let metadata: Metadata = [("name", "river")].into_iter().collect();
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"name":"river"}"#);
        assert_eq!(serde_json::from_str::<Metadata>(&json).unwrap(), metadata);
    }
}
