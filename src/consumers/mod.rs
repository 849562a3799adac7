//! Consumers built on the traversal driver
//!
//! Each consumer is a `DescriptorFold` plus a one-call entry point:
//! - `schema_json`: JSON Schema documents, with `$ref`s for recursive types
//! - `structural_hash`: blake3 digests that identify a shape independently of
//!   the registry it was built in
//! - `pretty_printer`: indented text rendering for documentation and debugging
//! - `validator`: structural checks with consumer-local errors

pub mod pretty_printer;
pub mod schema_json;
pub mod structural_hash;
pub mod validator;
