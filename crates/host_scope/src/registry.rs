//! The class descriptor table and its inheritance chain resolver.
//!
//! Descriptors live in an arena indexed by [`ClassId`]. Parent names are resolved to
//! ids once, while the registry is built, and the parent graph is checked for cycles
//! at that point. After construction the registry is immutable and may be shared
//! freely between threads.

use std::collections::HashMap;

use log::{debug, trace};

use crate::descriptor::ClassDescriptor;
use crate::error::{ConfigurationError, HostScopeError};

/// Stable arena index of a registered class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Walk state used by cycle detection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Immutable registry of every host class.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: Vec<ClassDescriptor>,
    parents: Vec<Option<ClassId>>,
    by_name: HashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Build a registry, validating names, constants, parent links and acyclicity.
    ///
    /// # Errors
    /// Returns a [`ConfigurationError`] for duplicate classes, duplicate constants within a
    /// class, parents that are not registered, or a parent cycle.
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = ClassDescriptor>,
    {
        let classes: Vec<ClassDescriptor> = descriptors.into_iter().collect();
        let mut by_name = HashMap::with_capacity(classes.len());
        for (index, descriptor) in classes.iter().enumerate() {
            if by_name
                .insert(descriptor.name().to_owned(), ClassId(index))
                .is_some()
            {
                return Err(ConfigurationError::DuplicateClass(descriptor.name().to_owned()));
            }
            check_unique_constants(descriptor)?;
        }

        let mut parents = Vec::with_capacity(classes.len());
        for descriptor in &classes {
            let parent = match descriptor.parent() {
                Some(parent_name) => Some(*by_name.get(parent_name).ok_or_else(|| {
                    ConfigurationError::UnknownParent {
                        class: descriptor.name().to_owned(),
                        parent: parent_name.to_owned(),
                    }
                })?),
                None => None,
            };
            parents.push(parent);
        }

        let registry = Self {
            classes,
            parents,
            by_name,
        };
        registry.check_acyclic()?;
        debug!(target: "host_scope", "class registry built with {} classes", registry.len());
        Ok(registry)
    }

    /// Every parent chain must end at a root. Each class has at most one parent, so a
    /// class met again on the current walk closes a cycle.
    fn check_acyclic(&self) -> Result<(), ConfigurationError> {
        let mut marks = vec![Mark::Unvisited; self.classes.len()];
        for start in 0..self.classes.len() {
            let mut path: Vec<usize> = Vec::new();
            let mut cursor = Some(start);
            while let Some(current) = cursor {
                match marks[current] {
                    Mark::Done => break,
                    Mark::OnPath => {
                        let first = path
                            .iter()
                            .position(|&on_path| on_path == current)
                            .unwrap_or_default();
                        let mut chain: Vec<String> = path[first..]
                            .iter()
                            .map(|&index| self.classes[index].name().to_owned())
                            .collect();
                        chain.push(self.classes[current].name().to_owned());
                        return Err(ConfigurationError::InheritanceCycle { chain });
                    }
                    Mark::Unvisited => {
                        marks[current] = Mark::OnPath;
                        path.push(current);
                        cursor = self.parents[current].map(ClassId::index);
                    }
                }
            }
            for index in path {
                marks[index] = Mark::Done;
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Look up the id of a class.
    ///
    /// # Errors
    /// Returns [`HostScopeError::UnknownClass`] if no class has this name.
    pub fn id_of(&self, name: &str) -> Result<ClassId, HostScopeError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| HostScopeError::UnknownClass(name.to_owned()))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The descriptor for a class name, if registered.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.by_name.get(name).map(|id| &self.classes[id.0])
    }

    /// The descriptor behind an id minted by this registry.
    #[inline]
    pub fn descriptor(&self, id: ClassId) -> &ClassDescriptor {
        &self.classes[id.0]
    }

    /// The parent of a class, if any.
    #[inline]
    pub fn parent_of(&self, id: ClassId) -> Option<ClassId> {
        self.parents[id.0]
    }

    /// All descriptors in registration order.
    #[inline]
    pub fn descriptors(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    /// All class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.iter().map(ClassDescriptor::name).collect();
        names.sort_unstable();
        names
    }

    /// Iterate `[self, parent, grandparent, ...]` as ids.
    #[inline]
    pub fn ancestry(&self, id: ClassId) -> Ancestry<'_> {
        Ancestry {
            registry: self,
            next: Some(id),
        }
    }

    /// The inheritance chain of a class: `[self, parent, grandparent, ...]`, ending at a
    /// class with no parent.
    ///
    /// # Errors
    /// Returns [`HostScopeError::UnknownClass`] if no class has this name.
    pub fn chain(&self, name: &str) -> Result<Vec<&ClassDescriptor>, HostScopeError> {
        let id = self.id_of(name)?;
        let chain: Vec<&ClassDescriptor> = self
            .ancestry(id)
            .map(|ancestor| self.descriptor(ancestor))
            .collect();
        trace!(target: "host_scope", "chain for {name}: {} entries", chain.len());
        Ok(chain)
    }
}

/// Iterator over a class and its ancestors. Terminates because the registry is acyclic.
#[derive(Clone)]
pub struct Ancestry<'registry> {
    registry: &'registry ClassRegistry,
    next: Option<ClassId>,
}

impl Iterator for Ancestry<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.registry.parent_of(current);
        Some(current)
    }
}

fn check_unique_constants(descriptor: &ClassDescriptor) -> Result<(), ConfigurationError> {
    let constants = descriptor.constants();
    for (index, constant) in constants.iter().enumerate() {
        if constants[..index]
            .iter()
            .any(|earlier| earlier.name() == constant.name())
        {
            return Err(ConfigurationError::DuplicateConstant {
                class: descriptor.name().to_owned(),
                constant: constant.name().to_owned(),
            });
        }
    }
    Ok(())
}
