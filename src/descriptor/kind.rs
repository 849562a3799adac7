use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of primitive (leaf) descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

/// Kinds of composite descriptors whose elements are other descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureKind {
    Class,
    Object,
    List,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolymorphicKind {
    Sealed,
    Open,
}

/// Discriminator for descriptor shapes
///
/// Consumers branch on this tag to decide how a descriptor's elements are
/// interpreted; the traversal driver itself never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerialKind {
    Primitive(PrimitiveKind),
    Structure(StructureKind),
    Enum,
    Polymorphic(PolymorphicKind),
    Contextual,
}

impl SerialKind {
    pub const CLASS: SerialKind = SerialKind::Structure(StructureKind::Class);
    pub const OBJECT: SerialKind = SerialKind::Structure(StructureKind::Object);
    pub const LIST: SerialKind = SerialKind::Structure(StructureKind::List);
    pub const MAP: SerialKind = SerialKind::Structure(StructureKind::Map);

    pub fn is_primitive(&self) -> bool {
        matches!(self, SerialKind::Primitive(_))
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Boolean => write!(f, "boolean"),
            PrimitiveKind::Byte => write!(f, "byte"),
            PrimitiveKind::Char => write!(f, "char"),
            PrimitiveKind::Short => write!(f, "short"),
            PrimitiveKind::Int => write!(f, "int"),
            PrimitiveKind::Long => write!(f, "long"),
            PrimitiveKind::Float => write!(f, "float"),
            PrimitiveKind::Double => write!(f, "double"),
            PrimitiveKind::String => write!(f, "string"),
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureKind::Class => write!(f, "class"),
            StructureKind::Object => write!(f, "object"),
            StructureKind::List => write!(f, "list"),
            StructureKind::Map => write!(f, "map"),
        }
    }
}

impl fmt::Display for SerialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialKind::Primitive(kind) => kind.fmt(f),
            SerialKind::Structure(kind) => kind.fmt(f),
            SerialKind::Enum => write!(f, "enum"),
            SerialKind::Polymorphic(PolymorphicKind::Sealed) => write!(f, "polymorphic-sealed"),
            SerialKind::Polymorphic(PolymorphicKind::Open) => write!(f, "polymorphic-open"),
            SerialKind::Contextual => write!(f, "contextual"),
        }
    }
}
