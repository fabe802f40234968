//! Constant accumulation over the inheritance chain.

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::collections::BTreeMap;

use log::trace;

use crate::error::HostScopeError;
use crate::identity::BrowserIdentity;
use crate::registry::{ClassId, ClassRegistry};

/// Classes whose enumerable surface is never collected: indexed or array-like and opaque
/// binary collections, plus classes whose enumerable surface differs between engines.
pub const EXCLUDED_CLASSES: [&str; 21] = [
    "Arguments",
    "Array",
    "ArrayBuffer",
    "BigInt64Array",
    "BigUint64Array",
    "DataView",
    "Error",
    "Float32Array",
    "Float64Array",
    "Int16Array",
    "Int32Array",
    "Int8Array",
    "Intl",
    "RegExp",
    "SharedArrayBuffer",
    "Uint16Array",
    "Uint32Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "WebAssembly",
    "Window",
];

/// Whether constant collection is skipped for this class.
#[inline]
pub fn is_excluded(class_name: &str) -> bool {
    EXCLUDED_CLASSES.contains(&class_name)
}

/// A constant as observed on a class, after inheritance and shadowing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedConstant {
    pub name: String,
    pub value: i64,
}

impl Display for ResolvedConstant {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}:{}", self.name, self.value)
    }
}

/// Collect the constants visible on `class_name` for `identity`, sorted by name.
///
/// The class itself always contributes; an ancestor contributes only when it has a
/// constructor under `identity`. The nearest declaration of a name wins. Classes that
/// are not global, or that are in [`EXCLUDED_CLASSES`], yield nothing.
///
/// # Errors
/// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
pub fn accumulate(
    registry: &ClassRegistry,
    identity: BrowserIdentity,
    class_name: &str,
) -> Result<Vec<ResolvedConstant>, HostScopeError> {
    let id = registry.id_of(class_name)?;
    Ok(accumulate_for(registry, identity, id))
}

/// [`accumulate`] for an id already resolved against `registry`.
pub fn accumulate_for(
    registry: &ClassRegistry,
    identity: BrowserIdentity,
    id: ClassId,
) -> Vec<ResolvedConstant> {
    let class = registry.descriptor(id);
    if !class.is_global(identity) || is_excluded(class.name()) {
        return Vec::new();
    }

    let mut collected = BTreeMap::new();
    for (depth, ancestor) in registry.ancestry(id).enumerate() {
        let descriptor = registry.descriptor(ancestor);
        if depth > 0 && !descriptor.constructor_kind(identity).has_constructor() {
            continue;
        }
        for constant in descriptor.constants() {
            if constant.is_visible(identity) {
                collected.entry(constant.name()).or_insert(constant.value());
            }
        }
    }
    trace!(
        target: "host_scope",
        "{identity}: {} exposes {} constants",
        class.name(),
        collected.len()
    );

    collected
        .into_iter()
        .map(|(name, value)| ResolvedConstant {
            name: name.to_owned(),
            value,
        })
        .collect()
}

/// Render constants the way the fixtures expect: `name:value` lines joined by `\n`.
pub fn render(constants: &[ResolvedConstant]) -> String {
    constants
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
