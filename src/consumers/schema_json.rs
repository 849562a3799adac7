use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::descriptor::{PrimitiveKind, SerialDescriptor, SerialKind, StructureKind};
use crate::error::DescriptorError;
use crate::traversal::{CyclePolicy, DescriptorFold, DescriptorWalker, ElementResult, WalkConfig};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("{serial_name}: {kind} descriptors have no JSON schema")]
    UnsupportedKind { serial_name: String, kind: SerialKind },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Fold producing a JSON Schema for a descriptor graph.
///
/// Recursive types are emitted as `{"$ref": "#/definitions/<serial name>"}` and
/// every referenced schema is listed under the root's `definitions`.
#[derive(Debug, Default)]
pub struct JsonSchemaGenerator {
    /// Expanded schemas of non-primitive descriptors, by serial name.
    expanded: BTreeMap<String, Value>,
    referenced: BTreeSet<String>,
}

impl JsonSchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the schema document for `root`.
    pub fn generate<D: SerialDescriptor>(root: &D) -> Result<Value, SchemaError> {
        let mut generator = JsonSchemaGenerator::new();
        let walker = DescriptorWalker::new(WalkConfig::new().with_cycle_policy(CyclePolicy::Reference));
        let mut schema = walker.walk(root, &mut generator)?;

        if !generator.referenced.is_empty() {
            let definitions: Map<String, Value> = generator
                .referenced
                .iter()
                .filter_map(|name| generator.expanded.get(name).map(|schema| (name.clone(), schema.clone())))
                .collect();
            if let Value::Object(document) = &mut schema {
                document.insert("definitions".to_string(), Value::Object(definitions));
            }
        }

        debug!(
            "Generated schema for {} ({} definitions)",
            root.serial_name(),
            generator.referenced.len()
        );
        Ok(schema)
    }
}

/// Escapes a serial name for use as one JSON Pointer reference token.
fn pointer_token(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

fn primitive_schema(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Boolean => json!({ "type": "boolean" }),
        PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int | PrimitiveKind::Long => {
            json!({ "type": "integer" })
        }
        PrimitiveKind::Float | PrimitiveKind::Double => json!({ "type": "number" }),
        PrimitiveKind::Char => json!({ "type": "string", "minLength": 1, "maxLength": 1 }),
        PrimitiveKind::String => json!({ "type": "string" }),
    }
}

impl<D: SerialDescriptor> DescriptorFold<D> for JsonSchemaGenerator {
    type Output = Value;
    type Error = SchemaError;

    fn combine(&mut self, descriptor: &D, elements: Vec<ElementResult<Value>>) -> Result<Value, SchemaError> {
        let serial_name = descriptor.serial_name();
        let schema = match descriptor.kind() {
            SerialKind::Primitive(kind) => primitive_schema(kind),
            SerialKind::Structure(StructureKind::Class) => {
                let required: Vec<Value> = elements
                    .iter()
                    .filter(|element| !element.optional)
                    .map(|element| Value::String(element.name.clone()))
                    .collect();
                let properties: Map<String, Value> = elements
                    .into_iter()
                    .map(|element| (element.name, element.value))
                    .collect();
                json!({
                    "type": "object",
                    "title": serial_name,
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false
                })
            }
            SerialKind::Structure(StructureKind::Object) => json!({ "type": "object", "title": serial_name }),
            SerialKind::Structure(StructureKind::List) => {
                let items = elements.into_iter().next().map_or_else(|| json!({}), |element| element.value);
                json!({ "type": "array", "items": items })
            }
            SerialKind::Structure(StructureKind::Map) => {
                let values = elements.into_iter().nth(1).map_or_else(|| json!({}), |element| element.value);
                json!({ "type": "object", "additionalProperties": values })
            }
            SerialKind::Enum => {
                let entries: Vec<Value> = elements.into_iter().map(|element| Value::String(element.name)).collect();
                json!({ "enum": entries })
            }
            kind @ (SerialKind::Polymorphic(_) | SerialKind::Contextual) => {
                return Err(SchemaError::UnsupportedKind {
                    serial_name: serial_name.to_string(),
                    kind,
                });
            }
        };

        let schema = if descriptor.is_nullable() {
            json!({ "anyOf": [schema, { "type": "null" }] })
        } else {
            schema
        };
        if !descriptor.kind().is_primitive() {
            self.expanded.insert(serial_name.to_string(), schema.clone());
        }
        Ok(schema)
    }

    fn reference(&mut self, descriptor: &D) -> Result<Value, SchemaError> {
        let serial_name = descriptor.serial_name().to_string();
        let reference = json!({ "$ref": format!("#/definitions/{}", pointer_token(&serial_name)) });
        self.referenced.insert(serial_name);
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorRegistry, ElementSpec, PolymorphicKind};

    #[test]
    fn test_class_schema() {
        let mut registry = DescriptorRegistry::new();
        let string = registry.primitive("String", PrimitiveKind::String).unwrap();
        let int = registry.primitive("Int", PrimitiveKind::Int).unwrap();
        let nullable_int = registry.nullable(int).unwrap();
        let user = registry
            .class(
                "User",
                vec![ElementSpec::new("name", string), ElementSpec::new("age", nullable_int).optional()],
            )
            .unwrap();
        let user = registry.descriptor(user).unwrap();

        let schema = JsonSchemaGenerator::generate(&user).unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "title": "User",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "anyOf": [{ "type": "integer" }, { "type": "null" }] }
                },
                "required": ["name"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_collections_and_enums() {
        let mut registry = DescriptorRegistry::new();
        let string = registry.primitive("String", PrimitiveKind::String).unwrap();
        let double = registry.primitive("Double", PrimitiveKind::Double).unwrap();
        let color = registry.enumeration("Color", &["Red", "Green"]).unwrap();
        let colors = registry.list_of("List<Color>", color).unwrap();
        let weights = registry.map_of("Map<String, Double>", string, double).unwrap();
        let palette = registry
            .class("Palette", vec![ElementSpec::new("colors", colors), ElementSpec::new("weights", weights)])
            .unwrap();
        let palette = registry.descriptor(palette).unwrap();

        let schema = JsonSchemaGenerator::generate(&palette).unwrap();
        assert_eq!(
            schema["properties"]["colors"],
            json!({ "type": "array", "items": { "enum": ["Red", "Green"] } })
        );
        assert_eq!(
            schema["properties"]["weights"],
            json!({ "type": "object", "additionalProperties": { "type": "number" } })
        );
        assert!(schema.get("definitions").is_none());
    }

    #[test]
    fn test_recursive_type_uses_definitions() {
        let mut registry = DescriptorRegistry::new();
        let node = registry.declare("Node", SerialKind::CLASS).unwrap();
        let children = registry.list_of("List<Node>", node).unwrap();
        registry.define_elements(node, vec![ElementSpec::new("children", children)]).unwrap();
        let node = registry.descriptor(node).unwrap();

        let schema = JsonSchemaGenerator::generate(&node).unwrap();
        assert_eq!(
            schema["properties"]["children"]["items"],
            json!({ "$ref": "#/definitions/Node" })
        );
        assert_eq!(schema["definitions"]["Node"]["title"], json!("Node"));
    }

    #[test]
    fn test_polymorphic_is_unsupported() {
        let mut registry = DescriptorRegistry::new();
        let shape = registry.declare("Shape", SerialKind::Polymorphic(PolymorphicKind::Sealed)).unwrap();
        let shape = registry.descriptor(shape).unwrap();

        let err = JsonSchemaGenerator::generate(&shape).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnsupportedKind {
                serial_name: "Shape".to_string(),
                kind: SerialKind::Polymorphic(PolymorphicKind::Sealed),
            }
        );
    }

    #[test]
    fn test_reference_escapes_pointer_characters() {
        let mut registry = DescriptorRegistry::new();
        let node = registry.declare("a/b~Node", SerialKind::CLASS).unwrap();
        let children = registry.list_of("List<a/b~Node>", node).unwrap();
        registry.define_elements(node, vec![ElementSpec::new("children", children)]).unwrap();
        let node = registry.descriptor(node).unwrap();

        let schema = JsonSchemaGenerator::generate(&node).unwrap();
        assert_eq!(
            schema["properties"]["children"]["items"],
            json!({ "$ref": "#/definitions/a~1b~0Node" })
        );
        // Definition keys stay unescaped; the pointer decodes back to them.
        assert_eq!(schema["definitions"]["a/b~Node"]["title"], json!("a/b~Node"));
        assert_eq!(schema.pointer("/definitions/a~1b~0Node/title"), Some(&json!("a/b~Node")));
    }
}
