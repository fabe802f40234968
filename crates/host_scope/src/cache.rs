//! Memoized resolution results, keyed by identity and class.
//!
//! Every resolver is a pure function of `(identity, class)` over an immutable registry,
//! so entries never need invalidation. The maps are concurrent and the cache can be
//! shared between threads.

use dashmap::DashMap;

use crate::constants::ResolvedConstant;
use crate::construction::ConstructionOutcome;
use crate::identity::BrowserIdentity;
use crate::registry::ClassId;
use crate::scope::ScopeEntry;

/// Cache key: one class under one identity.
type CacheKey = (BrowserIdentity, ClassId);

/// Thread-safe storage for resolved scopes, constant sets and construction outcomes.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    scopes: DashMap<CacheKey, ScopeEntry>,
    constants: DashMap<CacheKey, Vec<ResolvedConstant>>,
    outcomes: DashMap<CacheKey, ConstructionOutcome>,
}

impl ResolutionCache {
    /// Create an empty cache.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached scope entry, computing and storing it on a miss.
    pub fn scope_or_insert_with<F>(&self, key: CacheKey, compute: F) -> ScopeEntry
    where
        F: FnOnce() -> ScopeEntry,
    {
        *self.scopes.entry(key).or_insert_with(compute)
    }

    /// Return the cached constants, computing and storing them on a miss.
    pub fn constants_or_insert_with<F>(&self, key: CacheKey, compute: F) -> Vec<ResolvedConstant>
    where
        F: FnOnce() -> Vec<ResolvedConstant>,
    {
        self.constants.entry(key).or_insert_with(compute).clone()
    }

    /// Return the cached construction outcome, computing and storing it on a miss.
    pub fn outcome_or_insert_with<F>(&self, key: CacheKey, compute: F) -> ConstructionOutcome
    where
        F: FnOnce() -> ConstructionOutcome,
    {
        self.outcomes.entry(key).or_insert_with(compute).clone()
    }

    /// Total number of cached results across all three maps.
    pub fn len(&self) -> usize {
        self.scopes.len() + self.constants.len() + self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.scopes.clear();
        self.constants.clear();
        self.outcomes.clear();
    }
}
