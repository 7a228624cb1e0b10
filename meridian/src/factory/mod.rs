//! Factories produce geometries and other kernel objects bound to a precision model and reference system.
//!
//! A factory may carry internal factories for other contracts (e.g. every [`GeometryFactory`] carries a
//! [`MetadataFactory`](crate::metadata::MetadataFactory)). Internal factories are kept in a [`FactoryTable`] keyed by
//! the contract they implement and by the product types that contract declares.

use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use meridian_types::PrecisionModel;

use crate::error::MeridianError;
use crate::reference::ReferenceSystem;

mod geometry_factory;
mod registry;

pub use geometry_factory::{GeometryFactory, GeometryFactoryBuilder, GeometryFactoryConfig};
pub use registry::FactoryRegistry;

/// Common state of every factory.
pub trait Factory: Send + Sync + 'static {
    /// Precision model applied to everything the factory produces.
    fn precision_model(&self) -> &Arc<PrecisionModel>;

    /// Reference system stamped on everything the factory produces.
    fn reference_system(&self) -> Option<&ReferenceSystem>;

    /// Internal factories.
    fn factories(&self) -> &FactoryTable;
}

/// Abstract factory contract paired with the product types it creates.
///
/// Implemented for trait objects of contract traits (`dyn MetadataFactory`) and for concrete factories that serve as
/// their own contract ([`GeometryFactory`]).
pub trait Contract: Send + Sync + 'static {
    /// Name of the contract used in diagnostics.
    const NAME: &'static str;

    /// Types of the objects the contract produces.
    fn product_types() -> Vec<TypeId>;

    /// Internal factories of an instance implementing the contract.
    fn factories(instance: &Self) -> &FactoryTable;
}

pub(crate) type ErasedFactory = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
struct FactoryEntry {
    contract: TypeId,
    contract_name: &'static str,
    products: Vec<TypeId>,
    // Holds an `Arc<C>` for the entry's contract `C`.
    instance: ErasedFactory,
    nested: fn(&(dyn Any + Send + Sync)) -> Option<&FactoryTable>,
}

impl FactoryEntry {
    fn new<C: ?Sized + Contract>(instance: Arc<C>) -> Self {
        Self {
            contract: TypeId::of::<C>(),
            contract_name: C::NAME,
            products: C::product_types(),
            instance: Arc::new(instance),
            nested: nested_factories::<C>,
        }
    }

    fn nested(&self) -> Option<&FactoryTable> {
        (self.nested)(self.instance.as_ref())
    }

    fn handle(&self) -> FactoryHandle {
        FactoryHandle {
            contract_name: self.contract_name,
            instance: self.instance.clone(),
        }
    }
}

fn nested_factories<C: ?Sized + Contract>(
    instance: &(dyn Any + Send + Sync),
) -> Option<&FactoryTable> {
    instance
        .downcast_ref::<Arc<C>>()
        .map(|factory| C::factories(factory.as_ref()))
}

/// Table of internal factories of a factory.
///
/// Each contract can be registered at most once. Lookups check the table's own entries first and then search the
/// internal factories of each entry depth-first, in registration order.
#[derive(Default, Clone)]
pub struct FactoryTable {
    entries: Vec<FactoryEntry>,
}

impl FactoryTable {
    /// Registers a factory for the contract `C`.
    ///
    /// Fails with [`MeridianError::FactoryAlreadyRegistered`] if the table already has a factory for `C`.
    pub fn ensure_factory<C: ?Sized + Contract>(
        &mut self,
        instance: Arc<C>,
    ) -> Result<(), MeridianError> {
        if self.contains_own::<C>() {
            log::debug!("Factory for contract {} is already registered", C::NAME);
            return Err(MeridianError::FactoryAlreadyRegistered(C::NAME));
        }

        log::debug!("Registered internal factory for contract {}", C::NAME);
        self.entries.push(FactoryEntry::new(instance));
        Ok(())
    }

    /// Finds the factory for the contract `C`.
    pub fn get_factory<C: ?Sized + Contract>(&self) -> Option<Arc<C>> {
        let contract = TypeId::of::<C>();
        if let Some(entry) = self.entries.iter().find(|e| e.contract == contract) {
            return entry.instance.downcast_ref::<Arc<C>>().cloned();
        }

        self.entries
            .iter()
            .filter_map(FactoryEntry::nested)
            .find_map(FactoryTable::get_factory::<C>)
    }

    /// Finds the factory whose contract produces objects of type `P`.
    pub fn get_factory_for<P: ?Sized + 'static>(&self) -> Option<FactoryHandle> {
        let product = TypeId::of::<P>();
        if let Some(entry) = self.entries.iter().find(|e| e.products.contains(&product)) {
            return Some(entry.handle());
        }

        self.entries
            .iter()
            .filter_map(FactoryEntry::nested)
            .find_map(FactoryTable::get_factory_for::<P>)
    }

    /// Returns true if [`FactoryTable::get_factory`] would find a factory for `C`.
    pub fn contains_factory<C: ?Sized + Contract>(&self) -> bool {
        self.contains_own::<C>()
            || self
                .entries
                .iter()
                .filter_map(FactoryEntry::nested)
                .any(FactoryTable::contains_factory::<C>)
    }

    /// Returns true if [`FactoryTable::get_factory_for`] would find a factory for `P`.
    pub fn contains_factory_for<P: ?Sized + 'static>(&self) -> bool {
        self.get_factory_for::<P>().is_some()
    }

    /// Names of the contracts registered directly in this table, in registration order.
    pub fn contract_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.contract_name)
    }

    /// Number of factories registered directly in this table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains_own<C: ?Sized + Contract>(&self) -> bool {
        let contract = TypeId::of::<C>();
        self.entries.iter().any(|e| e.contract == contract)
    }
}

impl Debug for FactoryTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.contract_names()).finish()
    }
}

/// Factory found by product type, with its contract erased.
#[derive(Clone)]
pub struct FactoryHandle {
    contract_name: &'static str,
    instance: ErasedFactory,
}

impl FactoryHandle {
    pub(crate) fn from_erased(contract_name: &'static str, instance: ErasedFactory) -> Self {
        Self {
            contract_name,
            instance,
        }
    }

    /// Name of the contract the factory was registered for.
    pub fn contract_name(&self) -> &'static str {
        self.contract_name
    }

    /// Returns the factory as contract `C`, if it was registered for `C`.
    pub fn downcast<C: ?Sized + Contract>(&self) -> Option<Arc<C>> {
        self.instance.downcast_ref::<Arc<C>>().cloned()
    }
}

impl Debug for FactoryHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryHandle")
            .field("contract", &self.contract_name)
            .finish()
    }
}
