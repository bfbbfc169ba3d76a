//! Registry of every type known to a generation run
//!
//! The registry maps qualified type names to their descriptors. It is seeded
//! with the native scalar types, only ever grows, and refuses to register a
//! name twice.

use std::collections::HashMap;

use crate::atomic::AtomicType;
use crate::error::CoreError;
use crate::types::{CompoundType, EnumType, TypeDescriptor, UnionType};

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    /// Descriptors in registration order
    entries: Vec<TypeDescriptor>,
    /// Qualified name -> position in `entries`
    index: HashMap<String, usize>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry holding only the native scalar types
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(AtomicType::ALL.len()),
            index: HashMap::new(),
        };
        for atomic in AtomicType::ALL {
            registry.insert(atomic.spelling().to_string(), TypeDescriptor::Atomic(atomic));
        }
        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> Result<(), CoreError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(CoreError::DuplicateType(name));
        }
        self.insert(name, descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&TypeDescriptor, CoreError> {
        self.index
            .get(name)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| CoreError::UnknownType(name.to_string()))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Result<&mut TypeDescriptor, CoreError> {
        match self.index.get(name) {
            Some(&idx) => Ok(&mut self.entries[idx]),
            None => Err(CoreError::UnknownType(name.to_string())),
        }
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All descriptors in registration order, atomics first
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.iter()
    }

    pub fn compound_types(&self) -> impl Iterator<Item = &CompoundType> {
        self.entries.iter().filter_map(|entry| match entry {
            TypeDescriptor::Compound(compound) => Some(compound),
            _ => None,
        })
    }

    pub fn enum_types(&self) -> impl Iterator<Item = &EnumType> {
        self.entries.iter().filter_map(|entry| match entry {
            TypeDescriptor::Enum(enumeration) => Some(enumeration),
            _ => None,
        })
    }

    pub fn union_types(&self) -> impl Iterator<Item = &UnionType> {
        self.entries.iter().filter_map(|entry| match entry {
            TypeDescriptor::Union(union) => Some(union),
            _ => None,
        })
    }

    fn insert(&mut self, name: String, descriptor: TypeDescriptor) {
        self.index.insert(name, self.entries.len());
        self.entries.push(descriptor);
    }
}
