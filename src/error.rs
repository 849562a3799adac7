use thiserror::Error;

/// Errors raised by descriptors, the registry, and the traversal driver.
///
/// Consumers that need their own failure modes wrap this type with `#[from]`
/// rather than adding variants here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("element index {index} out of range for {serial_name} ({count} elements)")]
    IndexOutOfRange {
        serial_name: String,
        index: usize,
        count: usize,
    },

    #[error("cyclic schema at {serial_name}: {}", path.join(" -> "))]
    CyclicSchema {
        serial_name: String,
        /// Serial names from the first occurrence of the descriptor to its re-entry.
        path: Vec<String>,
    },

    #[error("{serial_name} was reached recursively but the consumer has no reference result")]
    ReferenceUnsupported { serial_name: String },

    #[error("traversal depth limit {limit} exceeded at {serial_name}")]
    DepthLimitExceeded { serial_name: String, limit: usize },

    #[error("unknown descriptor id {0}")]
    UnknownDescriptor(u32),

    #[error("serial name {0} is already registered")]
    DuplicateSerialName(String),

    #[error("duplicate element name {element} in {serial_name}")]
    DuplicateElementName { serial_name: String, element: String },

    #[error("elements of {0} are already defined")]
    AlreadyDefined(String),

    #[error("invalid walk configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DescriptorError>;
