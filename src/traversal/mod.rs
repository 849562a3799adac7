//! Cycle-safe traversal of descriptor graphs
//!
//! `accept` performs a single hop. Consumers that need whole-tree results plug a
//! `DescriptorFold` into a `DescriptorWalker`, which:
//! 1. Tracks the descriptors being expanded in a per-walk `TraversalSession`
//! 2. Visits elements in index order through `accept`
//! 3. Hands the element results to `DescriptorFold::combine`
//! 4. Applies the configured `CyclePolicy` when a descriptor is reached again
//!    while still on the stack
//!
//! Descriptors reached again after they completed (a type used in several
//! places) are not cycles and are expanded again, unless `walk_memoized` is used.

pub mod config;
pub mod session;
pub mod walker;

pub use config::{CyclePolicy, WalkConfig};
pub use session::{TraversalSession, VisitState};
pub use walker::{walk, DescriptorFold, DescriptorWalker, ElementResult};
