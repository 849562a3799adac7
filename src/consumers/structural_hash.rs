use std::fmt;

use blake3::Hash as Blake3Hash;
use tracing::debug;

use crate::descriptor::SerialDescriptor;
use crate::error::DescriptorError;
use crate::traversal::{CyclePolicy, DescriptorFold, DescriptorWalker, ElementResult, WalkConfig};

/// Digest of a descriptor's shape: kind, serial name, nullability, element
/// names and optionality, and the digests of all elements.
///
/// Identities do not contribute, so equal shapes built in different registries
/// hash the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHash(Blake3Hash);

impl ShapeHash {
    pub fn as_blake3(&self) -> &Blake3Hash {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl fmt::Display for ShapeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Fold computing `ShapeHash`es. Recursive occurrences hash as a
/// back-reference to the serial name instead of being expanded.
#[derive(Debug, Default)]
pub struct StructuralHasher;

impl StructuralHasher {
    pub fn hash<D: SerialDescriptor>(root: &D) -> Result<ShapeHash, DescriptorError> {
        let walker = DescriptorWalker::new(WalkConfig::new().with_cycle_policy(CyclePolicy::Reference));
        let hash = walker.walk_memoized(root, &mut StructuralHasher)?;
        debug!("Shape hash of {}: {}", root.serial_name(), hash);
        Ok(hash)
    }
}

fn update_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

impl<D: SerialDescriptor> DescriptorFold<D> for StructuralHasher {
    type Output = ShapeHash;
    type Error = DescriptorError;

    fn combine(&mut self, descriptor: &D, elements: Vec<ElementResult<ShapeHash>>) -> Result<ShapeHash, DescriptorError> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"descriptor");
        update_str(&mut hasher, &descriptor.kind().to_string());
        update_str(&mut hasher, descriptor.serial_name());
        hasher.update(&[descriptor.is_nullable() as u8]);
        hasher.update(&(elements.len() as u64).to_le_bytes());
        for element in &elements {
            update_str(&mut hasher, &element.name);
            hasher.update(&[element.optional as u8]);
            hasher.update(element.value.as_blake3().as_bytes());
        }
        Ok(ShapeHash(hasher.finalize()))
    }

    fn reference(&mut self, descriptor: &D) -> Result<ShapeHash, DescriptorError> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"reference");
        update_str(&mut hasher, descriptor.serial_name());
        Ok(ShapeHash(hasher.finalize()))
    }
}
