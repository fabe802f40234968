//! The engine facade: one registry, one instance factory, optional memoization.

use std::sync::Arc;

use crate::cache::ResolutionCache;
use crate::config::HostScopeConfig;
use crate::constants::{ResolvedConstant, accumulate_for};
use crate::construction::{
    ConstructionOutcome, DescriptorInstanceFactory, InstanceFactory, classify_for,
};
use crate::descriptor::ClassDescriptor;
use crate::error::HostScopeError;
use crate::global::GlobalScope;
use crate::identity::BrowserIdentity;
use crate::registry::ClassRegistry;
use crate::scope::{ScopeEntry, classify_descriptor};

/// Resolves scopes, constants and construction outcomes against a borrowed registry.
///
/// Cached and uncached engines return identical results; the cache only saves work.
pub struct HostScopeEngine<'registry> {
    registry: &'registry ClassRegistry,
    factory: Arc<dyn InstanceFactory>,
    cache: Option<ResolutionCache>,
}

impl<'registry> HostScopeEngine<'registry> {
    /// An uncached engine rendering instances from descriptors.
    pub fn new(registry: &'registry ClassRegistry) -> Self {
        Self {
            registry,
            factory: Arc::new(DescriptorInstanceFactory),
            cache: None,
        }
    }

    /// An engine configured from runtime settings.
    pub fn from_config(registry: &'registry ClassRegistry, config: &HostScopeConfig) -> Self {
        let engine = Self::new(registry);
        if config.cache_enabled {
            engine.with_cache()
        } else {
            engine
        }
    }

    /// Replace the construction collaborator.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn InstanceFactory>) -> Self {
        self.factory = factory;
        if let Some(cache) = &self.cache {
            cache.clear();
        }
        self
    }

    /// Memoize results per identity and class.
    #[must_use]
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(ResolutionCache::new());
        self
    }

    #[inline]
    pub const fn registry(&self) -> &'registry ClassRegistry {
        self.registry
    }

    #[inline]
    pub const fn cache(&self) -> Option<&ResolutionCache> {
        self.cache.as_ref()
    }

    /// The inheritance chain of a class.
    ///
    /// # Errors
    /// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
    pub fn chain(&self, class_name: &str) -> Result<Vec<&'registry ClassDescriptor>, HostScopeError> {
        self.registry.chain(class_name)
    }

    /// The global binding of a class.
    ///
    /// # Errors
    /// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
    pub fn scope(
        &self,
        identity: BrowserIdentity,
        class_name: &str,
    ) -> Result<ScopeEntry, HostScopeError> {
        let id = self.registry.id_of(class_name)?;
        let compute = || classify_descriptor(self.registry.descriptor(id), identity);
        Ok(match &self.cache {
            Some(cache) => cache.scope_or_insert_with((identity, id), compute),
            None => compute(),
        })
    }

    /// The sorted, de-duplicated constants visible on a class.
    ///
    /// # Errors
    /// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
    pub fn constants(
        &self,
        identity: BrowserIdentity,
        class_name: &str,
    ) -> Result<Vec<ResolvedConstant>, HostScopeError> {
        let id = self.registry.id_of(class_name)?;
        let compute = || accumulate_for(self.registry, identity, id);
        Ok(match &self.cache {
            Some(cache) => cache.constants_or_insert_with((identity, id), compute),
            None => compute(),
        })
    }

    /// The outcome of `new <class_name>()`.
    ///
    /// # Errors
    /// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
    pub fn construct(
        &self,
        identity: BrowserIdentity,
        class_name: &str,
    ) -> Result<ConstructionOutcome, HostScopeError> {
        let id = self.registry.id_of(class_name)?;
        let compute = || classify_for(self.registry, identity, id, self.factory.as_ref());
        Ok(match &self.cache {
            Some(cache) => cache.outcome_or_insert_with((identity, id), compute),
            None => compute(),
        })
    }

    /// Materialize the whole global scope for one identity.
    pub fn global_scope(&self, identity: BrowserIdentity) -> GlobalScope {
        GlobalScope::resolve(self.registry, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ConstantDescriptor, ConstructorKind};
    use crate::identity::BrowserFamily::{Chrome, InternetExplorer};
    use crate::predicate::CapabilityPredicate;

    struct Fixed(&'static str);

    impl InstanceFactory for Fixed {
        fn construct(&self, _identity: BrowserIdentity, _descriptor: &ClassDescriptor) -> Option<String> {
            Some(self.0.to_owned())
        }
    }

    fn registry() -> Result<ClassRegistry, HostScopeError> {
        Ok(ClassRegistry::from_descriptors([
            ClassDescriptor::new("Event")
                .with_constructor(CapabilityPredicate::always(ConstructorKind::ConstructibleThrows))
                .with_constant(ConstantDescriptor::new("AT_TARGET", 2))
                .with_constant(ConstantDescriptor::new("NONE", 0)),
            ClassDescriptor::new("Blob").with_constructor(
                CapabilityPredicate::always(ConstructorKind::Constructible)
                    .with_family(InternetExplorer, ConstructorKind::ConstructibleThrows),
            ),
        ])?)
    }

    #[test]
    fn cached_and_uncached_engines_agree() -> Result<(), HostScopeError> {
        let registry = registry()?;
        let plain = HostScopeEngine::new(&registry);
        let cached = HostScopeEngine::new(&registry).with_cache();

        for identity in BrowserIdentity::all_current() {
            for name in ["Event", "Blob"] {
                assert_eq!(plain.scope(identity, name)?, cached.scope(identity, name)?);
                assert_eq!(plain.constants(identity, name)?, cached.constants(identity, name)?);
                assert_eq!(plain.construct(identity, name)?, cached.construct(identity, name)?);
                // Second read comes from the cache and must not change.
                assert_eq!(plain.construct(identity, name)?, cached.construct(identity, name)?);
            }
        }
        assert!(cached.cache().is_some_and(|cache| !cache.is_empty()));
        Ok(())
    }

    #[test]
    fn custom_factory_is_consulted_only_for_constructible_classes() -> Result<(), HostScopeError> {
        let registry = registry()?;
        let engine = HostScopeEngine::new(&registry).with_factory(Arc::new(Fixed("custom")));

        assert_eq!(
            engine.construct(BrowserIdentity::current(Chrome), "Blob")?,
            ConstructionOutcome::Constructed("custom".to_owned())
        );
        assert_eq!(
            engine.construct(BrowserIdentity::version(InternetExplorer, 11), "Blob")?,
            ConstructionOutcome::Rejected
        );
        Ok(())
    }

    #[test]
    fn unknown_class_surfaces_from_every_query() -> Result<(), HostScopeError> {
        let registry = registry()?;
        let engine = HostScopeEngine::new(&registry).with_cache();
        let chrome = BrowserIdentity::current(Chrome);
        let unknown = Some(HostScopeError::UnknownClass("Nope".to_owned()));

        assert_eq!(engine.scope(chrome, "Nope").err(), unknown);
        assert_eq!(engine.constants(chrome, "Nope").err(), unknown);
        assert_eq!(engine.construct(chrome, "Nope").err(), unknown);
        assert_eq!(engine.chain("Nope").err(), unknown);
        Ok(())
    }
}
