use thiserror::Error;

use crate::descriptor::{SerialDescriptor, SerialKind, StructureKind};
use crate::error::DescriptorError;
use crate::traversal::{CyclePolicy, DescriptorFold, DescriptorWalker, ElementResult, WalkConfig};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{map}: map keys must be primitive or enum, found {key} ({key_kind})")]
    InvalidMapKey {
        map: String,
        key: String,
        key_kind: SerialKind,
    },

    #[error("{0}: enum has no entries")]
    EmptyEnum(String),

    #[error("{0}: class has no elements")]
    EmptyClass(String),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Structural checks over a descriptor graph. Recursive types are valid;
/// the first violation found (deepest first) is reported.
#[derive(Debug, Default)]
pub struct KindValidator {
    checked: usize,
}

impl KindValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of descriptors checked so far.
    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn validate<D: SerialDescriptor>(&mut self, root: &D) -> Result<(), ValidationError> {
        let walker = DescriptorWalker::new(WalkConfig::new().with_cycle_policy(CyclePolicy::Reference));
        walker.walk(root, self)
    }
}

pub fn validate<D: SerialDescriptor>(root: &D) -> Result<(), ValidationError> {
    KindValidator::new().validate(root)
}

impl<D: SerialDescriptor> DescriptorFold<D> for KindValidator {
    type Output = ();
    type Error = ValidationError;

    fn combine(&mut self, descriptor: &D, _elements: Vec<ElementResult<()>>) -> Result<(), ValidationError> {
        self.checked += 1;
        match descriptor.kind() {
            SerialKind::Structure(StructureKind::Map) => {
                let key = descriptor.element_descriptor(0)?;
                let key_kind = key.kind();
                if !key_kind.is_primitive() && key_kind != SerialKind::Enum {
                    return Err(ValidationError::InvalidMapKey {
                        map: descriptor.serial_name().to_string(),
                        key: key.serial_name().to_string(),
                        key_kind,
                    });
                }
            }
            SerialKind::Enum if descriptor.is_leaf() => {
                return Err(ValidationError::EmptyEnum(descriptor.serial_name().to_string()));
            }
            SerialKind::Structure(StructureKind::Class) if descriptor.is_leaf() => {
                return Err(ValidationError::EmptyClass(descriptor.serial_name().to_string()));
            }
            _ => {}
        }
        Ok(())
    }

    fn reference(&mut self, _descriptor: &D) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorRegistry, ElementSpec, PrimitiveKind};

    #[test]
    fn test_map_key_must_be_primitive_or_enum() {
        let mut registry = DescriptorRegistry::new();
        let int = registry.primitive("Int", PrimitiveKind::Int).unwrap();
        let point = registry
            .class("Point", vec![ElementSpec::new("x", int), ElementSpec::new("y", int)])
            .unwrap();
        let by_point = registry.map_of("Map<Point, Int>", point, int).unwrap();
        let color = registry.enumeration("Color", &["Red"]).unwrap();
        let by_color = registry.map_of("Map<Color, Int>", color, int).unwrap();

        assert!(validate(&registry.descriptor(by_color).unwrap()).is_ok());
        assert_eq!(
            validate(&registry.descriptor(by_point).unwrap()).unwrap_err(),
            ValidationError::InvalidMapKey {
                map: "Map<Point, Int>".to_string(),
                key: "Point".to_string(),
                key_kind: SerialKind::CLASS,
            }
        );
    }

    #[test]
    fn test_empty_enum_and_class() {
        let mut registry = DescriptorRegistry::new();
        let empty_enum = registry.enumeration("Nothing", &[]).unwrap();
        let empty_class = registry.class("Empty", Vec::new()).unwrap();
        let unit = registry.object("Unit").unwrap();

        assert_eq!(
            validate(&registry.descriptor(empty_enum).unwrap()).unwrap_err(),
            ValidationError::EmptyEnum("Nothing".to_string())
        );
        assert_eq!(
            validate(&registry.descriptor(empty_class).unwrap()).unwrap_err(),
            ValidationError::EmptyClass("Empty".to_string())
        );
        assert!(validate(&registry.descriptor(unit).unwrap()).is_ok());
    }

    #[test]
    fn test_recursive_types_are_valid() {
        let mut registry = DescriptorRegistry::new();
        let node = registry.declare("Node", SerialKind::CLASS).unwrap();
        let next = registry.nullable(node).unwrap();
        registry.define_elements(node, vec![ElementSpec::new("next", next)]).unwrap();

        let mut validator = KindValidator::new();
        validator.validate(&registry.descriptor(node).unwrap()).unwrap();
        // Node and Node? are checked; the second Node? occurrence is a reference.
        assert_eq!(validator.checked(), 2);
    }
}
