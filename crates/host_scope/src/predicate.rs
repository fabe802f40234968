//! Capability predicates: a default value plus browser-guarded overrides.
//!
//! Resolution picks the most specific matching rule:
//! exact family + release, then family only, then the default.

use core::mem::replace;
use core::str::FromStr;

use crate::error::ConfigurationError;
use crate::identity::{BrowserFamily, BrowserIdentity};

/// The condition under which an override applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    /// Any release of a family.
    Family(BrowserFamily),
    /// Exactly one family and release.
    Release(BrowserIdentity),
}

impl Guard {
    /// Whether this guard selects the given identity.
    #[inline]
    pub fn matches(self, identity: BrowserIdentity) -> bool {
        match self {
            Self::Family(family) => family == identity.family(),
            Self::Release(exact) => exact == identity,
        }
    }

    /// Higher wins when several guards match.
    #[inline]
    pub const fn specificity(self) -> u8 {
        match self {
            Self::Family(_) => 1,
            Self::Release(_) => 2,
        }
    }
}

impl FromStr for Guard {
    type Err = ConfigurationError;

    /// `ff` guards the whole family; `ff:115` or `ff:current` guards one release.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let identity = token.parse::<BrowserIdentity>()?;
        if token.contains(':') {
            Ok(Self::Release(identity))
        } else {
            Ok(Self::Family(identity.family()))
        }
    }
}

/// A single guarded override.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule<T> {
    guard: Guard,
    value: T,
}

/// A total, side-effect-free function from [`BrowserIdentity`] to `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityPredicate<T> {
    default: T,
    rules: Vec<Rule<T>>,
}

impl<T> CapabilityPredicate<T> {
    /// A predicate that resolves to `value` for every identity.
    #[inline]
    pub const fn always(value: T) -> Self {
        Self {
            default: value,
            rules: Vec::new(),
        }
    }

    /// Override the value for every release of `family`.
    #[must_use]
    pub fn with_family(mut self, family: BrowserFamily, value: T) -> Self {
        self.set_override(Guard::Family(family), value);
        self
    }

    /// Override the value for exactly one release.
    #[must_use]
    pub fn with_release(mut self, identity: BrowserIdentity, value: T) -> Self {
        self.set_override(Guard::Release(identity), value);
        self
    }

    /// Install an override, returning the value it replaced if the guard was already present.
    pub fn set_override(&mut self, guard: Guard, value: T) -> Option<T> {
        if let Some(existing) = self.rules.iter_mut().find(|rule| rule.guard == guard) {
            return Some(replace(&mut existing.value, value));
        }
        self.rules.push(Rule { guard, value });
        None
    }

    /// Resolve the predicate for one identity.
    pub fn resolve(&self, identity: BrowserIdentity) -> &T {
        self.rules
            .iter()
            .filter(|rule| rule.guard.matches(identity))
            .max_by_key(|rule| rule.guard.specificity())
            .map_or(&self.default, |rule| &rule.value)
    }

    /// Whether any branch of the predicate yields a value accepted by `test`.
    pub fn can_resolve_to<F>(&self, test: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        test(&self.default) || self.rules.iter().any(|rule| test(&rule.value))
    }
}

impl CapabilityPredicate<bool> {
    /// Shorthand for boolean capabilities.
    #[inline]
    pub fn holds(&self, identity: BrowserIdentity) -> bool {
        *self.resolve(identity)
    }
}

impl<T: Default> Default for CapabilityPredicate<T> {
    fn default() -> Self {
        Self::always(T::default())
    }
}
