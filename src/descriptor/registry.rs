//! Arena-backed descriptor storage
//!
//! Descriptors live in a `DescriptorRegistry` and refer to their elements by
//! `DescriptorId`, so recursive types are expressed by declaring a descriptor
//! first and defining its elements afterwards:
//!
//! ```ignore
//! let mut registry = DescriptorRegistry::new();
//! let node = registry.declare("Node", SerialKind::CLASS)?;
//! let children = registry.list_of("List<Node>", node)?;
//! registry.define_elements(node, vec![ElementSpec::new("children", children)])?;
//! ```
//!
//! Entries are never removed or mutated after their elements are defined, so a
//! `Descriptor<'_>` handle is a plain `Copy` view that any number of traversals
//! may share.

use std::fmt;
use std::ptr;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::kind::{PrimitiveKind, SerialKind};
use super::SerialDescriptor;
use crate::error::{DescriptorError, Result};

/// Identity of a descriptor within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(u32);

impl DescriptorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declaration of one element of a composite descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub name: String,
    pub descriptor: DescriptorId,
    pub optional: bool,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>, descriptor: DescriptorId) -> Self {
        ElementSpec {
            name: name.into(),
            descriptor,
            optional: false,
        }
    }

    /// Marks the element as optional (it has a default and may be absent).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[derive(Debug)]
struct Entry {
    serial_name: String,
    kind: SerialKind,
    nullable: bool,
    /// Entry whose element list this descriptor exposes. Equal to the entry's
    /// own id except for nullable variants, which share the original's list.
    elements_of: DescriptorId,
    elements: Vec<ElementSpec>,
    defined: bool,
}

/// Owner of every descriptor in a type graph.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    entries: Vec<Entry>,
    by_name: FxHashMap<String, DescriptorId>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a primitive descriptor. Registering the same name with the
    /// same kind again returns the existing id.
    pub fn primitive(&mut self, serial_name: &str, kind: PrimitiveKind) -> Result<DescriptorId> {
        if let Some(&id) = self.by_name.get(serial_name) {
            let existing = &self.entries[id.index()];
            if existing.kind == SerialKind::Primitive(kind) && !existing.nullable {
                return Ok(id);
            }
            return Err(DescriptorError::DuplicateSerialName(serial_name.to_string()));
        }
        let id = self.push(serial_name, SerialKind::Primitive(kind), false, None);
        self.entries[id.index()].defined = true;
        Ok(id)
    }

    /// Reserves a descriptor whose elements are supplied later through
    /// `define_elements`. Needed for any type that refers to itself.
    pub fn declare(&mut self, serial_name: &str, kind: SerialKind) -> Result<DescriptorId> {
        self.check_name_free(serial_name)?;
        Ok(self.push(serial_name, kind, false, None))
    }

    /// Sets the element list of a declared descriptor. Each descriptor can be
    /// defined once; defining a nullable variant defines its original.
    pub fn define_elements(&mut self, id: DescriptorId, elements: Vec<ElementSpec>) -> Result<()> {
        let owner = self.entry(id)?.elements_of;
        let serial_name = self.entries[owner.index()].serial_name.clone();
        if self.entries[owner.index()].defined {
            return Err(DescriptorError::AlreadyDefined(serial_name));
        }
        self.check_elements(&serial_name, &elements)?;
        trace!("Defined {} elements for {}", elements.len(), serial_name);
        let entry = &mut self.entries[owner.index()];
        entry.elements = elements;
        entry.defined = true;
        Ok(())
    }

    pub fn class(&mut self, serial_name: &str, elements: Vec<ElementSpec>) -> Result<DescriptorId> {
        self.composite(serial_name, SerialKind::CLASS, elements)
    }

    pub fn object(&mut self, serial_name: &str) -> Result<DescriptorId> {
        self.composite(serial_name, SerialKind::OBJECT, Vec::new())
    }

    /// Registers a list whose single element `"0"` is `element`.
    pub fn list_of(&mut self, serial_name: &str, element: DescriptorId) -> Result<DescriptorId> {
        self.composite(serial_name, SerialKind::LIST, vec![ElementSpec::new("0", element)])
    }

    /// Registers a map with key element `"0"` and value element `"1"`.
    pub fn map_of(&mut self, serial_name: &str, key: DescriptorId, value: DescriptorId) -> Result<DescriptorId> {
        self.composite(
            serial_name,
            SerialKind::MAP,
            vec![ElementSpec::new("0", key), ElementSpec::new("1", value)],
        )
    }

    /// Registers an enum. Every entry becomes an object descriptor named
    /// `<serial_name>.<entry>`.
    pub fn enumeration(&mut self, serial_name: &str, entries: &[&str]) -> Result<DescriptorId> {
        for (position, entry) in entries.iter().enumerate() {
            if entries[..position].contains(entry) {
                return Err(DescriptorError::DuplicateElementName {
                    serial_name: serial_name.to_string(),
                    element: entry.to_string(),
                });
            }
        }
        self.check_name_free(serial_name)?;
        let object_names: Vec<String> = entries.iter().map(|entry| format!("{}.{}", serial_name, entry)).collect();
        for name in &object_names {
            self.check_name_free(name)?;
        }

        let id = self.declare(serial_name, SerialKind::Enum)?;
        let mut elements = Vec::with_capacity(entries.len());
        for (entry, name) in entries.iter().zip(&object_names) {
            let object = self.object(name)?;
            elements.push(ElementSpec::new(*entry, object));
        }
        self.define_elements(id, elements)?;
        Ok(id)
    }

    /// Returns the nullable variant of `id`, named `<serial_name>?`. The
    /// variant has its own identity but shares the original's elements.
    pub fn nullable(&mut self, id: DescriptorId) -> Result<DescriptorId> {
        let entry = self.entry(id)?;
        if entry.nullable {
            return Ok(id);
        }
        let serial_name = format!("{}?", entry.serial_name);
        if let Some(&existing) = self.by_name.get(&serial_name) {
            return Ok(existing);
        }
        let kind = entry.kind;
        let owner = entry.elements_of;
        let nullable = self.push(&serial_name, kind, true, Some(owner));
        self.entries[nullable.index()].defined = true;
        Ok(nullable)
    }

    pub fn descriptor(&self, id: DescriptorId) -> Result<Descriptor<'_>> {
        self.entry(id)?;
        Ok(Descriptor { registry: self, id })
    }

    pub fn lookup(&self, serial_name: &str) -> Option<Descriptor<'_>> {
        self.by_name
            .get(serial_name)
            .map(|&id| Descriptor { registry: self, id })
    }

    /// Registers a descriptor together with its elements. Everything that can
    /// fail is checked before the entry is created, so an error leaves the
    /// registry unchanged.
    fn composite(&mut self, serial_name: &str, kind: SerialKind, elements: Vec<ElementSpec>) -> Result<DescriptorId> {
        self.check_name_free(serial_name)?;
        self.check_elements(serial_name, &elements)?;
        let id = self.declare(serial_name, kind)?;
        self.define_elements(id, elements)?;
        Ok(id)
    }

    fn check_name_free(&self, serial_name: &str) -> Result<()> {
        if self.by_name.contains_key(serial_name) {
            return Err(DescriptorError::DuplicateSerialName(serial_name.to_string()));
        }
        Ok(())
    }

    fn check_elements(&self, serial_name: &str, elements: &[ElementSpec]) -> Result<()> {
        for (position, element) in elements.iter().enumerate() {
            self.entry(element.descriptor)?;
            if elements[..position].iter().any(|other| other.name == element.name) {
                return Err(DescriptorError::DuplicateElementName {
                    serial_name: serial_name.to_string(),
                    element: element.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn push(&mut self, serial_name: &str, kind: SerialKind, nullable: bool, elements_of: Option<DescriptorId>) -> DescriptorId {
        let id = DescriptorId(self.entries.len() as u32);
        self.entries.push(Entry {
            serial_name: serial_name.to_string(),
            kind,
            nullable,
            elements_of: elements_of.unwrap_or(id),
            elements: Vec::new(),
            defined: false,
        });
        self.by_name.insert(serial_name.to_string(), id);
        id
    }

    fn entry(&self, id: DescriptorId) -> Result<&Entry> {
        self.entries
            .get(id.index())
            .ok_or(DescriptorError::UnknownDescriptor(id.0))
    }
}

/// Handle to one descriptor of a `DescriptorRegistry`.
#[derive(Clone, Copy)]
pub struct Descriptor<'a> {
    registry: &'a DescriptorRegistry,
    id: DescriptorId,
}

impl<'a> Descriptor<'a> {
    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn registry(&self) -> &'a DescriptorRegistry {
        self.registry
    }

    fn entry(&self) -> &'a Entry {
        &self.registry.entries[self.id.index()]
    }

    fn elements(&self) -> &'a [ElementSpec] {
        &self.registry.entries[self.entry().elements_of.index()].elements
    }

    fn element(&self, index: usize) -> Result<&'a ElementSpec> {
        let elements = self.elements();
        elements.get(index).ok_or_else(|| DescriptorError::IndexOutOfRange {
            serial_name: self.entry().serial_name.clone(),
            index,
            count: elements.len(),
        })
    }
}

impl SerialDescriptor for Descriptor<'_> {
    type Id = DescriptorId;

    fn identity(&self) -> DescriptorId {
        self.id
    }

    fn serial_name(&self) -> &str {
        &self.entry().serial_name
    }

    fn kind(&self) -> SerialKind {
        self.entry().kind
    }

    fn is_nullable(&self) -> bool {
        self.entry().nullable
    }

    fn elements_count(&self) -> usize {
        self.elements().len()
    }

    fn element_descriptor(&self, index: usize) -> Result<Self> {
        let element = self.element(index)?;
        Ok(Descriptor {
            registry: self.registry,
            id: element.descriptor,
        })
    }

    fn element_name(&self, index: usize) -> Result<&str> {
        Ok(self.element(index)?.name.as_str())
    }

    fn is_element_optional(&self, index: usize) -> Result<bool> {
        Ok(self.element(index)?.optional)
    }
}

impl PartialEq for Descriptor<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.registry, other.registry) && self.id == other.id
    }
}

impl Eq for Descriptor<'_> {}

impl fmt::Debug for Descriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Descriptor({} {}: {})", self.id, self.serial_name(), self.kind())
    }
}
