//! Visitor pattern for descriptor trees
//!
//! A `DescriptorVisitor` computes one result from one descriptor. `accept`
//! binds a descriptor to a visitor and is nothing more than a forwarding call:
//! it never recurses, tracks cycles, or combines child results. A visitor that
//! wants the whole tree calls `accept` again on the children it obtains through
//! `SerialDescriptor::element_descriptor`.
//!
//! # Usage
//!
//! ```ignore
//! use descriptor_visitor::visitor::{Accept, DescriptorVisitor};
//!
//! struct NameOf;
//!
//! impl<D: SerialDescriptor> DescriptorVisitor<D, String> for NameOf {
//!     fn visit_descriptor(&mut self, descriptor: &D) -> String {
//!         descriptor.serial_name().to_string()
//!     }
//! }
//!
//! let name = descriptor.accept(&mut NameOf);
//! let count = descriptor.accept_fn(|d| d.elements_count());
//! ```
//!
//! Full-tree consumers should build on `crate::traversal` instead of hand
//! rolling recursion, since descriptor graphs of recursive types are cyclic.

mod visitor_trait;

pub mod adapter;

pub use adapter::{visitor_fn, FnVisitor};
pub use visitor_trait::{accept, Accept, DescriptorVisitor};
