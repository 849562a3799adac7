pub mod consumers;
pub mod descriptor;
pub mod error;
pub mod logging;
pub mod traversal;
pub mod visitor;

pub use descriptor::{Descriptor, DescriptorId, DescriptorRegistry, ElementSpec, SerialDescriptor, SerialKind};
pub use error::{DescriptorError, Result};
pub use traversal::{walk, CyclePolicy, DescriptorFold, DescriptorWalker, ElementResult, WalkConfig};
pub use visitor::{accept, visitor_fn, Accept, DescriptorVisitor, FnVisitor};
