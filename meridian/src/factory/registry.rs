use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use meridian_types::PrecisionModel;
use parking_lot::RwLock;

use super::{Contract, ErasedFactory, FactoryHandle, GeometryFactory};
use crate::error::MeridianError;
use crate::metadata::{DefaultMetadataFactory, MetadataFactory};

type Provider = Arc<dyn Fn() -> ErasedFactory + Send + Sync>;

struct Registration {
    contract: TypeId,
    contract_name: &'static str,
    products: Vec<TypeId>,
    instance: ErasedFactory,
}

struct LazyRegistration {
    contract: TypeId,
    contract_name: &'static str,
    products: Vec<TypeId>,
    provider: Provider,
}

#[derive(Default)]
struct RegistryState {
    registrations: Vec<Registration>,
    providers: Vec<LazyRegistration>,
}

impl RegistryState {
    fn registration(&self, contract: TypeId) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.contract == contract)
    }

    fn provider(&self, contract: TypeId) -> Option<&LazyRegistration> {
        self.providers.iter().find(|p| p.contract == contract)
    }
}

/// Mapping from factory contracts to their default implementations.
///
/// A registry is created by the application and handed to the components that need default factories. Factories are
/// either registered explicitly or constructed on first request by a provider. An explicit registration always takes
/// precedence over a provider, and the first registration of a contract wins unless
/// [`register_overwrite`](Self::register_overwrite) is used.
///
/// The registry is safe to share between threads. When several threads request a contract that has only a provider,
/// each of them may run the provider, but all of them receive the instance stored by the first one.
///
/// ```
/// use meridian::factory::{FactoryRegistry, GeometryFactory};
/// use meridian::geometry::Point;
///
/// let registry = FactoryRegistry::with_defaults();
/// let factory = registry.get_factory::<GeometryFactory>()?;
/// let handle = registry.get_factory_for::<Point>()?;
/// assert_eq!(handle.contract_name(), "GeometryFactory");
/// # Ok::<(), meridian::error::MeridianError>(())
/// ```
#[derive(Default)]
pub struct FactoryRegistry {
    state: RwLock<RegistryState>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with providers for the kernel's own contracts: a [`GeometryFactory`] with the shared default
    /// precision model and no reference system, and a [`DefaultMetadataFactory`].
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_provider(|| GeometryFactory::new(PrecisionModel::shared_default(), None));
        registry.register_provider(|| -> Arc<dyn MetadataFactory> {
            Arc::new(DefaultMetadataFactory::default())
        });
        registry
    }

    /// Registers the default factory for the contract `C`.
    ///
    /// Returns false and keeps the existing factory if one is already registered.
    pub fn register<C: ?Sized + Contract>(&self, factory: Arc<C>) -> bool {
        let mut state = self.state.write();
        if state.registration(TypeId::of::<C>()).is_some() {
            log::debug!(
                "Factory for contract {} is already registered, keeping the existing one",
                C::NAME
            );
            return false;
        }

        log::debug!("Registered factory for contract {}", C::NAME);
        state.registrations.push(registration(factory));
        true
    }

    /// Registers the default factory for the contract `C`, replacing the existing one.
    pub fn register_overwrite<C: ?Sized + Contract>(&self, factory: Arc<C>) {
        let mut state = self.state.write();
        let contract = TypeId::of::<C>();
        state.registrations.retain(|r| r.contract != contract);

        log::debug!("Registered factory for contract {} with overwrite", C::NAME);
        state.registrations.push(registration(factory));
    }

    /// Registers a provider that creates the factory for the contract `C` when it is first requested.
    ///
    /// Replaces a previously registered provider for the same contract. Has no effect on a factory that was already
    /// registered or created.
    pub fn register_provider<C: ?Sized + Contract>(
        &self,
        provider: impl Fn() -> Arc<C> + Send + Sync + 'static,
    ) {
        let mut state = self.state.write();
        let contract = TypeId::of::<C>();
        state.providers.retain(|p| p.contract != contract);
        state.providers.push(LazyRegistration {
            contract,
            contract_name: C::NAME,
            products: C::product_types(),
            provider: Arc::new(move || -> ErasedFactory { Arc::new(provider()) }),
        });
    }

    /// Returns the default factory for the contract `C`.
    ///
    /// Fails with [`MeridianError::FactoryNotFound`] if neither a factory nor a provider is registered for `C`.
    pub fn get_factory<C: ?Sized + Contract>(&self) -> Result<Arc<C>, MeridianError> {
        let instance = self.resolve(TypeId::of::<C>(), C::NAME)?;
        instance
            .downcast_ref::<Arc<C>>()
            .cloned()
            .ok_or(MeridianError::FactoryNotFound(C::NAME))
    }

    /// Returns the default factory whose contract produces objects of type `P`.
    pub fn get_factory_for<P: ?Sized + 'static>(&self) -> Result<FactoryHandle, MeridianError> {
        let product = TypeId::of::<P>();
        let contract = {
            let state = self.state.read();
            state
                .registrations
                .iter()
                .find(|r| r.products.contains(&product))
                .map(|r| (r.contract, r.contract_name))
                .or_else(|| {
                    state
                        .providers
                        .iter()
                        .find(|p| p.products.contains(&product))
                        .map(|p| (p.contract, p.contract_name))
                })
        };

        let Some((contract, contract_name)) = contract else {
            return Err(MeridianError::FactoryNotFound(std::any::type_name::<P>()));
        };

        let instance = self.resolve(contract, contract_name)?;
        Ok(FactoryHandle::from_erased(contract_name, instance))
    }

    /// Returns true if a factory or a provider is registered for the contract `C`.
    pub fn contains_factory<C: ?Sized + Contract>(&self) -> bool {
        let state = self.state.read();
        let contract = TypeId::of::<C>();
        state.registration(contract).is_some() || state.provider(contract).is_some()
    }

    /// Returns true if a factory or a provider is registered for a contract producing `P`.
    pub fn contains_factory_for<P: ?Sized + 'static>(&self) -> bool {
        let state = self.state.read();
        let product = TypeId::of::<P>();
        state.registrations.iter().any(|r| r.products.contains(&product))
            || state.providers.iter().any(|p| p.products.contains(&product))
    }

    fn resolve(
        &self,
        contract: TypeId,
        contract_name: &'static str,
    ) -> Result<ErasedFactory, MeridianError> {
        let provider = {
            let state = self.state.read();
            if let Some(registration) = state.registration(contract) {
                return Ok(registration.instance.clone());
            }

            match state.provider(contract) {
                Some(lazy) => lazy.provider.clone(),
                None => return Err(MeridianError::FactoryNotFound(contract_name)),
            }
        };

        // The provider runs without holding the lock, so it may request other factories from this registry.
        log::debug!("Creating default factory for contract {contract_name}");
        let created = provider();

        let mut state = self.state.write();
        if let Some(registration) = state.registration(contract) {
            log::trace!("Factory for {contract_name} was created concurrently, dropping this one");
            return Ok(registration.instance.clone());
        }

        let products = state
            .provider(contract)
            .map(|lazy| lazy.products.clone())
            .unwrap_or_default();
        state.registrations.push(Registration {
            contract,
            contract_name,
            products,
            instance: created.clone(),
        });

        Ok(created)
    }
}

fn registration<C: ?Sized + Contract>(factory: Arc<C>) -> Registration {
    let instance: Arc<dyn Any + Send + Sync> = Arc::new(factory);
    Registration {
        contract: TypeId::of::<C>(),
        contract_name: C::NAME,
        products: C::product_types(),
        instance,
    }
}

impl Debug for FactoryRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("FactoryRegistry")
            .field(
                "registered",
                &state
                    .registrations
                    .iter()
                    .map(|r| r.contract_name)
                    .collect::<Vec<_>>(),
            )
            .field(
                "providers",
                &state.providers.iter().map(|p| p.contract_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::factory::Factory;
    use crate::geometry::{Point, Polygon};
    use crate::metadata::Metadata;
    use crate::reference::ReferenceSystem;
    use assert_matches::assert_matches;

    fn fixed_factory() -> Arc<GeometryFactory> {
        GeometryFactory::new(
            Arc::new(PrecisionModel::fixed(10.0).unwrap()),
            Some(ReferenceSystem::wgs84()),
        )
    }

    #[test]
    fn first_registration_wins() {
        let registry = FactoryRegistry::new();
        let first = fixed_factory();
        let second = GeometryFactory::new(PrecisionModel::shared_default(), None);

        assert!(registry.register(first.clone()));
        assert!(!registry.register(second));

        let factory = registry.get_factory::<GeometryFactory>().unwrap();
        assert!(Arc::ptr_eq(&factory, &first));
    }

    #[test]
    fn overwrite_replaces_registration() {
        let registry = FactoryRegistry::new();
        let replacement = fixed_factory();
        registry.register(GeometryFactory::new(PrecisionModel::shared_default(), None));
        registry.register_overwrite(replacement.clone());

        let factory = registry.get_factory::<GeometryFactory>().unwrap();
        assert!(Arc::ptr_eq(&factory, &replacement));
    }

    #[test]
    fn explicit_registration_takes_precedence_over_provider() {
        let registry = FactoryRegistry::with_defaults();
        let explicit = fixed_factory();
        registry.register(explicit.clone());

        let factory = registry.get_factory::<GeometryFactory>().unwrap();
        assert!(Arc::ptr_eq(&factory, &explicit));
        assert_eq!(factory.reference_system(), Some(&ReferenceSystem::wgs84()));
    }

    #[test]
    fn provider_is_used_once() {
        let registry = FactoryRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        registry.register_provider(move || {
            counter.fetch_add(1, Ordering::Relaxed);
            GeometryFactory::new(PrecisionModel::shared_default(), None)
        });

        let first = registry.get_factory::<GeometryFactory>().unwrap();
        let second = registry.get_factory::<GeometryFactory>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        // Registration after the provider ran keeps the created instance.
        assert!(!registry.register(fixed_factory()));
    }

    #[test]
    fn lookup_by_product() {
        let registry = FactoryRegistry::with_defaults();

        let handle = registry.get_factory_for::<Polygon>().unwrap();
        assert_eq!(handle.contract_name(), "GeometryFactory");
        assert!(handle.downcast::<GeometryFactory>().is_some());
        assert!(handle.downcast::<dyn MetadataFactory>().is_none());

        let handle = registry.get_factory_for::<Metadata>().unwrap();
        let metadata_factory = handle.downcast::<dyn MetadataFactory>().unwrap();
        assert!(metadata_factory.create_metadata().is_empty());

        assert!(registry.contains_factory_for::<Point>());
        assert!(!registry.contains_factory_for::<String>());
    }

    #[test]
    fn missing_factory() {
        let registry = FactoryRegistry::new();
        assert!(!registry.contains_factory::<GeometryFactory>());
        assert_matches!(
            registry.get_factory::<GeometryFactory>(),
            Err(MeridianError::FactoryNotFound("GeometryFactory"))
        );
        assert_matches!(
            registry.get_factory_for::<Point>(),
            Err(MeridianError::FactoryNotFound(_))
        );
    }

    #[test]
    fn concurrent_first_use_returns_single_instance() {
        let _ = env_logger::builder().is_test(true).try_init();

        let registry = Arc::new(FactoryRegistry::with_defaults());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.get_factory::<GeometryFactory>().unwrap())
            })
            .collect();

        let factories: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(factories.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn debug_lists_contracts() {
        let registry = FactoryRegistry::with_defaults();
        registry.get_factory::<GeometryFactory>().unwrap();
        insta::assert_debug_snapshot!(registry, @r#"
        FactoryRegistry {
            registered: [
                "GeometryFactory",
            ],
            providers: [
                "GeometryFactory",
                "MetadataFactory",
            ],
        }
        "#);
    }
}
