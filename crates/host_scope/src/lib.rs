//! Host object capability model and global scope resolution for emulated browsers.
//!
//! Given a browser identity, this crate decides which host classes are bound in
//! global scope, which numeric constants each exposes, and what a zero-argument
//! `new X()` produces.
//!
//! # Architecture
//!
//! ```text
//! CapabilityPredicate      (identity -> value, most specific rule wins)
//!     ↓
//! ClassDescriptor / ClassRegistry   (data table, parent links, cycle check)
//!     ↓
//! materialize / accumulate / classify   (pure per-identity resolvers)
//!     ↓
//! HostScopeEngine + ResolutionCache + GlobalScope
//!     ↓
//! Probe / ProbeLog / FixtureSuite   (what a page script would log)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use host_scope::{BrowserIdentity, HostScopeEngine, default_registry};
//!
//! let registry = default_registry()?;
//! let engine = HostScopeEngine::new(registry).with_cache();
//! let firefox: BrowserIdentity = "ff".parse()?;
//! assert_eq!(engine.scope(firefox, "BatteryManager")?.type_of(), "undefined");
//! ```

#![forbid(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    reason = "Type names like HostScopeConfig and HostScopeError read better at call sites"
)]

pub mod cache;
pub mod config;
pub mod constants;
pub mod construction;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod global;
pub mod identity;
pub mod loader;
pub mod predicate;
pub mod probe;
pub mod registry;
pub mod scope;

pub use cache::ResolutionCache;
pub use config::HostScopeConfig;
pub use constants::{EXCLUDED_CLASSES, ResolvedConstant, accumulate, is_excluded, render};
pub use construction::{ConstructionOutcome, DescriptorInstanceFactory, InstanceFactory, classify};
pub use descriptor::{ClassDescriptor, ConstantDescriptor, ConstructorKind, InstanceForm};
pub use engine::HostScopeEngine;
pub use error::{ConfigurationError, HostScopeError};
pub use fixtures::{FixtureCase, FixtureMismatch, FixtureSuite};
pub use global::{GlobalScope, ScriptError};
pub use identity::{BrowserFamily, BrowserIdentity, ReleaseTrack};
pub use loader::{default_registry, descriptors_from_str, load_registry_path, load_registry_str};
pub use predicate::{CapabilityPredicate, Guard};
pub use probe::{Probe, ProbeLog, ProbeSink, probe_output, run_probe};
pub use registry::{Ancestry, ClassId, ClassRegistry};
pub use scope::{ScopeEntry, materialize};
