//! Shared helpers for integration tests.

#![allow(dead_code)]

use descriptor_visitor::descriptor::{DescriptorId, DescriptorRegistry, ElementSpec, PrimitiveKind, SerialKind};
use descriptor_visitor::DescriptorError;
use test_utils::descriptor::generator::{NodeKind, PrimitiveTag, ShapeSpec};

/// Registers every node of `spec` and returns the id of its root.
pub fn build_shape(registry: &mut DescriptorRegistry, spec: &ShapeSpec) -> Result<DescriptorId, DescriptorError> {
    let mut ids = Vec::with_capacity(spec.nodes.len());
    for node in &spec.nodes {
        let id = match node.kind {
            NodeKind::Primitive(tag) => registry.primitive(&node.name, primitive_kind(tag))?,
            NodeKind::Class => registry.declare(&node.name, SerialKind::CLASS)?,
            NodeKind::List => registry.declare(&node.name, SerialKind::LIST)?,
            NodeKind::Map => registry.declare(&node.name, SerialKind::MAP)?,
        };
        ids.push(id);
    }

    for (node, &id) in spec.nodes.iter().zip(&ids) {
        if matches!(node.kind, NodeKind::Primitive(_)) {
            continue;
        }
        let elements = node
            .elements
            .iter()
            .map(|element| {
                let spec = ElementSpec::new(element.name.clone(), ids[element.target]);
                if element.optional { spec.optional() } else { spec }
            })
            .collect();
        registry.define_elements(id, elements)?;
    }

    Ok(ids[0])
}

fn primitive_kind(tag: PrimitiveTag) -> PrimitiveKind {
    match tag {
        PrimitiveTag::Boolean => PrimitiveKind::Boolean,
        PrimitiveTag::Int => PrimitiveKind::Int,
        PrimitiveTag::Long => PrimitiveKind::Long,
        PrimitiveTag::Double => PrimitiveKind::Double,
        PrimitiveTag::String => PrimitiveKind::String,
    }
}

/// `Person { name: String, nickname: String? (optional), friends: List<Person> }`
pub fn person(registry: &mut DescriptorRegistry) -> DescriptorId {
    let string = registry.primitive("String", PrimitiveKind::String).unwrap();
    let nickname = registry.nullable(string).unwrap();
    let person = registry.declare("Person", SerialKind::CLASS).unwrap();
    let friends = registry.list_of("List<Person>", person).unwrap();
    registry
        .define_elements(
            person,
            vec![
                ElementSpec::new("name", string),
                ElementSpec::new("nickname", nickname).optional(),
                ElementSpec::new("friends", friends),
            ],
        )
        .unwrap();
    person
}
