//! Scope materialization: how a class name is bound in the global scope of one browser.

use core::fmt::{Display, Formatter, Result as FmtResult};

use log::trace;

use crate::descriptor::ClassDescriptor;
use crate::error::HostScopeError;
use crate::identity::{BrowserFamily, BrowserIdentity};
use crate::registry::ClassRegistry;

/// The observable global binding of a class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeEntry {
    /// The name is not bound.
    Absent,
    /// Bound to a constructor function.
    Function,
    /// Bound to a plain namespace object.
    Object,
}

impl ScopeEntry {
    /// What a `typeof` probe reports for this binding.
    #[inline]
    pub const fn type_of(self) -> &'static str {
        match self {
            Self::Absent => "undefined",
            Self::Function => "function",
            Self::Object => "object",
        }
    }

    #[inline]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// What `String(<name>)` logs for a binding of this kind. Firefox prints native
    /// function bodies across three lines.
    pub fn class_name_string(self, identity: BrowserIdentity, name: &str) -> String {
        match self {
            Self::Absent => "ReferenceError".to_owned(),
            Self::Function
                if matches!(identity.family(), BrowserFamily::Firefox | BrowserFamily::FirefoxEsr) =>
            {
                format!("function {name}() {{\n    [native code]\n}}")
            }
            Self::Function => format!("function {name}() {{ [native code] }}"),
            Self::Object => format!("[object {name}]"),
        }
    }
}

impl Display for ScopeEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.type_of())
    }
}

/// Classify one descriptor under one identity. The descriptor's own `global` capability
/// and resolved constructor kind are the only inputs.
pub fn classify_descriptor(descriptor: &ClassDescriptor, identity: BrowserIdentity) -> ScopeEntry {
    if !descriptor.is_global(identity) {
        return ScopeEntry::Absent;
    }
    if descriptor.constructor_kind(identity).has_constructor() {
        ScopeEntry::Function
    } else {
        ScopeEntry::Object
    }
}

/// Resolve the global binding of `class_name` for `identity`.
///
/// # Errors
/// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
pub fn materialize(
    registry: &ClassRegistry,
    identity: BrowserIdentity,
    class_name: &str,
) -> Result<ScopeEntry, HostScopeError> {
    let id = registry.id_of(class_name)?;
    let entry = classify_descriptor(registry.descriptor(id), identity);
    trace!(target: "host_scope", "{identity}: {class_name} is {entry}");
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ConstructorKind;
    use crate::predicate::CapabilityPredicate;

    #[test]
    fn namespace_objects_are_not_functions() -> Result<(), HostScopeError> {
        let registry = ClassRegistry::from_descriptors([
            ClassDescriptor::new("Atomics"),
            ClassDescriptor::new("Blob")
                .with_constructor(CapabilityPredicate::always(ConstructorKind::Constructible)),
            ClassDescriptor::new("Window")
                .with_constructor(CapabilityPredicate::always(ConstructorKind::ConstructibleThrows)),
        ])?;
        let chrome = BrowserIdentity::current(BrowserFamily::Chrome);

        assert_eq!(materialize(&registry, chrome, "Atomics")?, ScopeEntry::Object);
        assert_eq!(materialize(&registry, chrome, "Blob")?, ScopeEntry::Function);
        assert_eq!(materialize(&registry, chrome, "Window")?, ScopeEntry::Function);
        Ok(())
    }

    #[test]
    fn absence_dominates_constructor_settings() -> Result<(), HostScopeError> {
        let registry = ClassRegistry::from_descriptors([ClassDescriptor::new("BatteryManager")
            .with_global(CapabilityPredicate::always(true).with_family(BrowserFamily::Firefox, false))
            .with_constructor(CapabilityPredicate::always(ConstructorKind::Constructible))])?;

        assert_eq!(
            materialize(&registry, BrowserIdentity::current(BrowserFamily::Firefox), "BatteryManager")?,
            ScopeEntry::Absent
        );
        assert_eq!(
            materialize(&registry, BrowserIdentity::current(BrowserFamily::Chrome), "BatteryManager")?,
            ScopeEntry::Function
        );
        Ok(())
    }

    #[test]
    fn class_name_strings() {
        let chrome = BrowserIdentity::current(BrowserFamily::Chrome);
        assert_eq!(
            ScopeEntry::Function.class_name_string(chrome, "Blob"),
            "function Blob() { [native code] }"
        );
        assert_eq!(ScopeEntry::Object.class_name_string(chrome, "Atomics"), "[object Atomics]");
        assert_eq!(ScopeEntry::Absent.class_name_string(chrome, "Nope"), "ReferenceError");
    }

    #[test]
    fn firefox_spreads_native_functions_over_lines() {
        for family in [BrowserFamily::Firefox, BrowserFamily::FirefoxEsr] {
            let identity = BrowserIdentity::current(family);
            assert_eq!(
                ScopeEntry::Function.class_name_string(identity, "Blob"),
                "function Blob() {\n    [native code]\n}"
            );
            assert_eq!(ScopeEntry::Object.class_name_string(identity, "Math"), "[object Math]");
        }
    }

    #[test]
    fn type_of_strings() {
        assert_eq!(ScopeEntry::Absent.type_of(), "undefined");
        assert_eq!(ScopeEntry::Function.to_string(), "function");
        assert_eq!(ScopeEntry::Object.to_string(), "object");
    }
}
