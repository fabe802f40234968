//! Host class descriptors: one data record per host class name.

use crate::identity::BrowserIdentity;
use crate::predicate::CapabilityPredicate;

/// How the global binding for a class behaves when invoked with `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConstructorKind {
    /// No constructor: the global is a plain namespace object.
    #[default]
    None,
    /// A constructor that accepts a zero-argument call.
    Constructible,
    /// A constructor exists but rejects a zero-argument call.
    ConstructibleThrows,
}

impl ConstructorKind {
    /// Whether the global binding is a function.
    #[inline]
    pub const fn has_constructor(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// The string form a freshly constructed instance renders as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum InstanceForm {
    /// `[object <ClassName>]`.
    #[default]
    Interface,
    /// `[object <Interface>]` for alias constructors such as `Image`.
    Alias(String),
    /// A class specific rendering, possibly empty.
    Literal(String),
}

/// A constant exposed on a host class, e.g. `Node.ELEMENT_NODE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDescriptor {
    name: String,
    value: i64,
    visibility: CapabilityPredicate<bool>,
}

impl ConstantDescriptor {
    /// A constant visible in every browser.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            visibility: CapabilityPredicate::always(true),
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: CapabilityPredicate<bool>) -> Self {
        self.visibility = visibility;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }

    #[inline]
    pub const fn visibility(&self) -> &CapabilityPredicate<bool> {
        &self.visibility
    }

    #[inline]
    pub fn is_visible(&self, identity: BrowserIdentity) -> bool {
        self.visibility.holds(identity)
    }
}

/// Declarative description of one host class.
///
/// Descriptors are plain data. Every host class shares this one record type and the
/// engine never needs a Rust type per class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    name: String,
    parent: Option<String>,
    global: CapabilityPredicate<bool>,
    constructor: CapabilityPredicate<ConstructorKind>,
    constants: Vec<ConstantDescriptor>,
    instance: InstanceForm,
}

impl ClassDescriptor {
    /// A global, non-constructible class with no parent and no constants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            global: CapabilityPredicate::always(true),
            constructor: CapabilityPredicate::always(ConstructorKind::None),
            constants: Vec::new(),
            instance: InstanceForm::Interface,
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_global(mut self, global: CapabilityPredicate<bool>) -> Self {
        self.global = global;
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: CapabilityPredicate<ConstructorKind>) -> Self {
        self.constructor = constructor;
        self
    }

    #[must_use]
    pub fn with_constant(mut self, constant: ConstantDescriptor) -> Self {
        self.constants.push(constant);
        self
    }

    #[must_use]
    pub fn with_instance(mut self, instance: InstanceForm) -> Self {
        self.instance = instance;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[inline]
    pub const fn global(&self) -> &CapabilityPredicate<bool> {
        &self.global
    }

    #[inline]
    pub const fn constructor(&self) -> &CapabilityPredicate<ConstructorKind> {
        &self.constructor
    }

    #[inline]
    pub fn constants(&self) -> &[ConstantDescriptor] {
        &self.constants
    }

    #[inline]
    pub const fn instance(&self) -> &InstanceForm {
        &self.instance
    }

    /// Whether this class is bound in the global scope for `identity`.
    #[inline]
    pub fn is_global(&self, identity: BrowserIdentity) -> bool {
        self.global.holds(identity)
    }

    #[inline]
    pub fn constructor_kind(&self, identity: BrowserIdentity) -> ConstructorKind {
        *self.constructor.resolve(identity)
    }
}
