//! Error taxonomy for registry loading and queries.
//!
//! Only engine failures live here. The domain outcomes callers assert on
//! (`ScopeEntry::Absent`, `ConstructionOutcome::Unresolved`/`Rejected`) are
//! ordinary return values.

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;

/// A malformed descriptor table. Fatal at load time, never raised by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The parent links form a cycle; `chain` lists the classes on it, starting and ending
    /// with the same name.
    InheritanceCycle { chain: Vec<String> },
    /// Two descriptors share a name.
    DuplicateClass(String),
    /// A descriptor names a parent that is not registered.
    UnknownParent { class: String, parent: String },
    /// A class declares the same constant twice.
    DuplicateConstant { class: String, constant: String },
    /// Two overrides with the same specificity for the same browser.
    DuplicateOverride { subject: String, browser: String },
    /// A browser token that names no known family or release.
    UnknownBrowser(String),
    /// The configuration text could not be decoded.
    Malformed(String),
}

impl Display for ConfigurationError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InheritanceCycle { chain } => {
                write!(formatter, "inheritance cycle: {}", chain.join(" -> "))
            }
            Self::DuplicateClass(name) => write!(formatter, "duplicate host class '{name}'"),
            Self::UnknownParent { class, parent } => {
                write!(formatter, "host class '{class}' extends unknown class '{parent}'")
            }
            Self::DuplicateConstant { class, constant } => {
                write!(formatter, "host class '{class}' declares constant '{constant}' twice")
            }
            Self::DuplicateOverride { subject, browser } => {
                write!(formatter, "duplicate override for '{browser}' in {subject}")
            }
            Self::UnknownBrowser(token) => write!(formatter, "unknown browser '{token}'"),
            Self::Malformed(message) => write!(formatter, "malformed configuration: {message}"),
        }
    }
}

impl Error for ConfigurationError {}

/// Errors surfaced by registry construction and by queries against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostScopeError {
    /// The registry could not be built.
    Configuration(ConfigurationError),
    /// A query named a class that is not registered. Caller error; never retried.
    UnknownClass(String),
}

impl Display for HostScopeError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Configuration(inner) => write!(formatter, "configuration error: {inner}"),
            Self::UnknownClass(name) => write!(formatter, "unknown host class '{name}'"),
        }
    }
}

impl Error for HostScopeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(inner) => Some(inner),
            Self::UnknownClass(_) => None,
        }
    }
}

impl From<ConfigurationError> for HostScopeError {
    #[inline]
    fn from(inner: ConfigurationError) -> Self {
        Self::Configuration(inner)
    }
}
