//! JSON descriptor tables.
//!
//! The raw serde shapes below mirror the on-disk format and are converted into
//! descriptors before the registry validates them.

use std::fs;
use std::path::Path;

use anyhow::Context as _;
use log::{debug, warn};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::descriptor::{ClassDescriptor, ConstantDescriptor, ConstructorKind, InstanceForm};
use crate::error::{ConfigurationError, HostScopeError};
use crate::predicate::{CapabilityPredicate, Guard};
use crate::registry::ClassRegistry;

/// The built-in host class table.
const BUILTIN_CLASSES: &str = include_str!("../data/host_classes.json");

static DEFAULT_REGISTRY: OnceCell<ClassRegistry> = OnceCell::new();

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRegistry {
    classes: Vec<RawClass>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClass {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    global: Option<RawPredicate<bool>>,
    #[serde(default)]
    constructor: Option<RawPredicate<RawConstructorKind>>,
    #[serde(default)]
    instance: Option<RawInstance>,
    #[serde(default)]
    constants: Vec<RawConstant>,
}

/// Either a fixed value or a default with browser overrides.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPredicate<T> {
    Fixed(T),
    Conditional(RawConditional<T>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawConditional<T> {
    default: T,
    #[serde(default = "Vec::new")]
    overrides: Vec<RawOverride<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawOverride<T> {
    browser: String,
    value: T,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawConstructorKind {
    None,
    Constructible,
    Throws,
}

impl From<RawConstructorKind> for ConstructorKind {
    #[inline]
    fn from(raw: RawConstructorKind) -> Self {
        match raw {
            RawConstructorKind::None => Self::None,
            RawConstructorKind::Constructible => Self::Constructible,
            RawConstructorKind::Throws => Self::ConstructibleThrows,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawInstance {
    Alias(String),
    Literal(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConstant {
    name: String,
    value: i64,
    #[serde(default)]
    visible: Option<RawPredicate<bool>>,
}

/// Convert a raw predicate, rejecting two overrides for the same browser token.
pub(crate) fn convert_predicate<T, U, F>(
    raw: RawPredicate<T>,
    subject: &str,
    convert: F,
) -> Result<CapabilityPredicate<U>, ConfigurationError>
where
    F: Fn(T) -> U,
{
    match raw {
        RawPredicate::Fixed(value) => Ok(CapabilityPredicate::always(convert(value))),
        RawPredicate::Conditional(conditional) => {
            let mut predicate = CapabilityPredicate::always(convert(conditional.default));
            for rule in conditional.overrides {
                let guard = rule.browser.parse::<Guard>()?;
                if predicate.set_override(guard, convert(rule.value)).is_some() {
                    return Err(ConfigurationError::DuplicateOverride {
                        subject: subject.to_owned(),
                        browser: rule.browser,
                    });
                }
            }
            Ok(predicate)
        }
    }
}

fn convert_flag(
    raw: Option<RawPredicate<bool>>,
    subject: &str,
) -> Result<CapabilityPredicate<bool>, ConfigurationError> {
    raw.map_or_else(
        || Ok(CapabilityPredicate::always(true)),
        |predicate| convert_predicate(predicate, subject, |flag| flag),
    )
}

fn convert_class(raw: RawClass) -> Result<ClassDescriptor, ConfigurationError> {
    let global = convert_flag(raw.global, &format!("{}.global", raw.name))?;
    let constructor = match raw.constructor {
        Some(predicate) => convert_predicate(
            predicate,
            &format!("{}.constructor", raw.name),
            ConstructorKind::from,
        )?,
        None => CapabilityPredicate::always(ConstructorKind::None),
    };
    let instance = match raw.instance {
        Some(RawInstance::Alias(interface)) => InstanceForm::Alias(interface),
        Some(RawInstance::Literal(text)) => InstanceForm::Literal(text),
        None => InstanceForm::Interface,
    };

    let mut descriptor = ClassDescriptor::new(raw.name.clone())
        .with_global(global)
        .with_constructor(constructor)
        .with_instance(instance);
    if let Some(parent) = raw.parent {
        descriptor = descriptor.extends(parent);
    }
    for constant in raw.constants {
        let visibility = convert_flag(
            constant.visible,
            &format!("{}.{}.visible", raw.name, constant.name),
        )?;
        descriptor = descriptor
            .with_constant(ConstantDescriptor::new(constant.name, constant.value).with_visibility(visibility));
    }
    Ok(descriptor)
}

/// Decode a JSON descriptor table into descriptors without validating links.
///
/// # Errors
/// Returns a [`ConfigurationError`] for undecodable text, unknown browser tokens, or
/// duplicate overrides.
pub fn descriptors_from_str(text: &str) -> Result<Vec<ClassDescriptor>, ConfigurationError> {
    let raw: RawRegistry =
        serde_json::from_str(text).map_err(|error| ConfigurationError::Malformed(error.to_string()))?;
    raw.classes.into_iter().map(convert_class).collect()
}

/// Build and validate a registry from a JSON descriptor table.
///
/// # Errors
/// Returns [`HostScopeError::Configuration`] if the table is malformed or fails validation.
pub fn load_registry_str(text: &str) -> Result<ClassRegistry, HostScopeError> {
    let descriptors = descriptors_from_str(text)?;
    for descriptor in &descriptors {
        if !descriptor.global().can_resolve_to(|visible| *visible) {
            warn!(
                target: "host_scope::loader",
                "host class '{}' is not global for any browser",
                descriptor.name()
            );
        }
    }
    let registry = ClassRegistry::from_descriptors(descriptors)?;
    debug!(target: "host_scope::loader", "loaded {} host classes", registry.len());
    Ok(registry)
}

/// Build and validate a registry from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or its table is invalid.
pub fn load_registry_path(path: &Path) -> anyhow::Result<ClassRegistry> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read host class table {}", path.display()))?;
    load_registry_str(&text)
        .with_context(|| format!("invalid host class table {}", path.display()))
}

/// The built-in registry, decoded once per process.
///
/// # Errors
/// Returns [`HostScopeError::Configuration`] if the embedded table fails validation.
pub fn default_registry() -> Result<&'static ClassRegistry, HostScopeError> {
    DEFAULT_REGISTRY.get_or_try_init(|| load_registry_str(BUILTIN_CLASSES))
}
