//! Classification of a zero-argument `new X()` attempt.

use core::fmt::{Display, Formatter, Result as FmtResult};

use log::trace;

use crate::descriptor::{ClassDescriptor, ConstructorKind, InstanceForm};
use crate::error::HostScopeError;
use crate::identity::BrowserIdentity;
use crate::registry::{ClassId, ClassRegistry};

/// Observable result of `new X()`.
///
/// The two failure kinds stay distinct: scripts see a `ReferenceError` for an unbound
/// name and a `TypeError` for a bound value that cannot be constructed this way.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstructionOutcome {
    /// The name is not in global scope.
    Unresolved,
    /// The name is bound but the call is rejected.
    Rejected,
    /// A fresh instance, rendered as a string.
    Constructed(String),
}

impl ConstructionOutcome {
    /// The string a probe script logs for this outcome.
    pub fn render(&self) -> &str {
        match self {
            Self::Unresolved => "ReferenceError",
            Self::Rejected => "TypeError",
            Self::Constructed(representation) => representation,
        }
    }
}

impl Display for ConstructionOutcome {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.render())
    }
}

/// The collaborator that performs construction for an in-scope constructible class.
///
/// Returning `None` rejects the zero-argument call.
pub trait InstanceFactory: Send + Sync {
    /// Construct an instance of `descriptor` with no arguments and render it.
    fn construct(&self, identity: BrowserIdentity, descriptor: &ClassDescriptor) -> Option<String>;
}

/// Renders instances straight from the descriptor's [`InstanceForm`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorInstanceFactory;

impl InstanceFactory for DescriptorInstanceFactory {
    fn construct(&self, _identity: BrowserIdentity, descriptor: &ClassDescriptor) -> Option<String> {
        Some(match descriptor.instance() {
            InstanceForm::Interface => format!("[object {}]", descriptor.name()),
            InstanceForm::Alias(interface) => format!("[object {interface}]"),
            InstanceForm::Literal(text) => text.clone(),
        })
    }
}

/// Classify `new <class_name>()` under `identity`.
///
/// # Errors
/// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
pub fn classify(
    registry: &ClassRegistry,
    identity: BrowserIdentity,
    class_name: &str,
    factory: &dyn InstanceFactory,
) -> Result<ConstructionOutcome, HostScopeError> {
    let id = registry.id_of(class_name)?;
    Ok(classify_for(registry, identity, id, factory))
}

/// [`classify`] for an id already resolved against `registry`.
pub fn classify_for(
    registry: &ClassRegistry,
    identity: BrowserIdentity,
    id: ClassId,
    factory: &dyn InstanceFactory,
) -> ConstructionOutcome {
    let descriptor = registry.descriptor(id);
    let outcome = if descriptor.is_global(identity) {
        match descriptor.constructor_kind(identity) {
            ConstructorKind::None | ConstructorKind::ConstructibleThrows => {
                ConstructionOutcome::Rejected
            }
            ConstructorKind::Constructible => factory
                .construct(identity, descriptor)
                .map_or(ConstructionOutcome::Rejected, ConstructionOutcome::Constructed),
        }
    } else {
        ConstructionOutcome::Unresolved
    };
    trace!(target: "host_scope", "{identity}: new {}() -> {outcome:?}", descriptor.name());
    outcome
}
