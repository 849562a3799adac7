//! Serialization descriptors
//!
//! A descriptor describes the shape of a serializable type: its kind, its
//! serial name, and an ordered list of elements, each with a name and the
//! descriptor of the element's type. Descriptors form a rooted graph that may
//! contain cycles when a type refers to itself, directly or through other types.
//!
//! - `SerialDescriptor`: the interface every traversal relies on
//! - `registry`: an arena-backed implementation addressed by `DescriptorId`
//! - `kind`: the `SerialKind` tag consumers branch on

use std::fmt;
use std::hash::Hash;

use crate::error::Result;

pub mod kind;
pub mod registry;

pub use kind::{PolymorphicKind, PrimitiveKind, SerialKind, StructureKind};
pub use registry::{Descriptor, DescriptorId, DescriptorRegistry, ElementSpec};

/// Read-only view of a descriptor node.
///
/// Implementations must be cheap to obtain by value: `element_descriptor`
/// returns a fresh handle for every call, and traversals hold one handle per
/// level of recursion.
pub trait SerialDescriptor: Sized {
    /// Stable identity used for cycle detection. Two handles with the same
    /// identity denote the same node regardless of the path that reached them.
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn identity(&self) -> Self::Id;

    fn serial_name(&self) -> &str;

    fn kind(&self) -> SerialKind;

    fn is_nullable(&self) -> bool;

    fn elements_count(&self) -> usize;

    /// Returns the descriptor of the element at `index`.
    ///
    /// # Errors
    /// `DescriptorError::IndexOutOfRange` unless `index < elements_count()`.
    fn element_descriptor(&self, index: usize) -> Result<Self>;

    fn element_name(&self, index: usize) -> Result<&str>;

    fn is_element_optional(&self, index: usize) -> Result<bool>;

    /// Returns the index of the element called `name`, if any.
    fn element_index(&self, name: &str) -> Option<usize> {
        (0..self.elements_count()).find(|&index| self.element_name(index).is_ok_and(|n| n == name))
    }

    fn is_leaf(&self) -> bool {
        self.elements_count() == 0
    }
}
