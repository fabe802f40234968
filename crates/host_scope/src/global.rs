//! The scriptable global object for one browser identity.
//!
//! Bare-name lookups (`typeof Blob`) and global-property lookups (`typeof window.Blob`)
//! both read the one map built here.

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::collections::BTreeMap;
use std::error::Error;

use log::debug;
use rayon::prelude::*;

use crate::identity::BrowserIdentity;
use crate::registry::ClassRegistry;
use crate::scope::{ScopeEntry, classify_descriptor};

/// An error a script would observe when evaluating against the global object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// An identifier that is not bound in global scope.
    ReferenceError(String),
}

impl ScriptError {
    /// The error constructor name, which is what the probes log.
    #[inline]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ReferenceError(_) => "ReferenceError",
        }
    }
}

impl Display for ScriptError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ReferenceError(name) => write!(formatter, "ReferenceError: {name} is not defined"),
        }
    }
}

impl Error for ScriptError {}

/// Every class bound in global scope for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalScope {
    identity: BrowserIdentity,
    entries: BTreeMap<String, ScopeEntry>,
}

impl GlobalScope {
    /// Materialize every registered class for `identity`, keeping present names only.
    pub fn resolve(registry: &ClassRegistry, identity: BrowserIdentity) -> Self {
        let entries: BTreeMap<String, ScopeEntry> = registry
            .descriptors()
            .par_iter()
            .filter_map(|descriptor| {
                let entry = classify_descriptor(descriptor, identity);
                entry
                    .is_present()
                    .then(|| (descriptor.name().to_owned(), entry))
            })
            .collect();
        debug!(
            target: "host_scope",
            "{identity}: global scope holds {} of {} classes",
            entries.len(),
            registry.len()
        );
        Self { identity, entries }
    }

    #[inline]
    pub const fn identity(&self) -> BrowserIdentity {
        self.identity
    }

    /// The binding for `name`, `Absent` when unbound.
    #[inline]
    pub fn entry(&self, name: &str) -> ScopeEntry {
        self.entries.get(name).copied().unwrap_or(ScopeEntry::Absent)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// `typeof <name>`.
    #[inline]
    pub fn type_of_bare(&self, name: &str) -> &'static str {
        self.entry(name).type_of()
    }

    /// `typeof window.<name>`.
    #[inline]
    pub fn type_of_property(&self, name: &str) -> &'static str {
        self.entry(name).type_of()
    }

    /// Evaluate the bare identifier `name`.
    ///
    /// # Errors
    /// Returns [`ScriptError::ReferenceError`] when `name` is not bound.
    pub fn reference(&self, name: &str) -> Result<ScopeEntry, ScriptError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::ReferenceError(name.to_owned()))
    }

    /// `String(<name>)`.
    pub fn class_name_string(&self, name: &str) -> String {
        self.entry(name).class_name_string(self.identity, name)
    }

    /// Present global names, sorted.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Present names together with their bindings, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, ScopeEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), *entry))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
