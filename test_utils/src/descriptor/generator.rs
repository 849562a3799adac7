//! Random descriptor graph shapes for property-based testing.
//!
//! A `ShapeSpec` is a plain description of a type graph: node 0 is the root and
//! every element points at a node by index, so cycles are just back edges. It
//! does not depend on any descriptor implementation; tests turn it into real
//! descriptors with whatever registry they exercise.
//!
//! `ShapeSpec` may contain cycles. `AcyclicShape` only generates edges to
//! higher indices, which makes the graph a DAG (shared nodes still occur).

use quickcheck::{Arbitrary, Gen};

/// Upper bound on generated nodes. Keeps path counts of DAGs small enough that
/// unmemoized walks stay fast.
const MAX_NODES: usize = 8;
const MAX_CLASS_ELEMENTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveTag {
    Boolean,
    Int,
    Long,
    Double,
    String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Primitive(PrimitiveTag),
    Class,
    List,
    Map,
}

#[derive(Clone, Debug)]
pub struct ShapeElement {
    pub name: String,
    pub target: usize,
    pub optional: bool,
}

#[derive(Clone, Debug)]
pub struct ShapeNode {
    pub name: String,
    pub kind: NodeKind,
    pub elements: Vec<ShapeElement>,
}

#[derive(Clone, Debug)]
pub struct ShapeSpec {
    pub nodes: Vec<ShapeNode>,
}

/// A `ShapeSpec` guaranteed to have no cycles.
#[derive(Clone, Debug)]
pub struct AcyclicShape(pub ShapeSpec);

impl ShapeSpec {
    pub fn root(&self) -> &ShapeNode {
        &self.nodes[0]
    }

    /// Number of distinct paths from the root to any node, counting the root.
    /// Only meaningful for acyclic shapes.
    pub fn path_count(&self) -> usize {
        self.paths_from(0)
    }

    fn paths_from(&self, node: usize) -> usize {
        1 + self.nodes[node]
            .elements
            .iter()
            .map(|element| self.paths_from(element.target))
            .sum::<usize>()
    }

    /// Number of distinct nodes reachable from the root, root included.
    pub fn reachable_count(&self) -> usize {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![0];
        while let Some(node) = stack.pop() {
            if seen[node] {
                continue;
            }
            seen[node] = true;
            stack.extend(self.nodes[node].elements.iter().map(|element| element.target));
        }
        seen.into_iter().filter(|&reached| reached).count()
    }

    /// True if some node reachable from the root lies on a cycle.
    pub fn has_reachable_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            White,
            Grey,
            Black,
        }

        fn visit(spec: &ShapeSpec, node: usize, marks: &mut [Mark]) -> bool {
            marks[node] = Mark::Grey;
            for element in &spec.nodes[node].elements {
                let mark = marks[element.target];
                if mark == Mark::Grey || (mark == Mark::White && visit(spec, element.target, marks)) {
                    return true;
                }
            }
            marks[node] = Mark::Black;
            false
        }

        let mut marks = vec![Mark::White; self.nodes.len()];
        visit(self, 0, &mut marks)
    }
}

fn gen_primitive(g: &mut Gen) -> PrimitiveTag {
    const CHOICES: &[PrimitiveTag] = &[
        PrimitiveTag::Boolean,
        PrimitiveTag::Int,
        PrimitiveTag::Long,
        PrimitiveTag::Double,
        PrimitiveTag::String,
    ];
    CHOICES[usize::arbitrary(g) % CHOICES.len()]
}

fn gen_target(g: &mut Gen, first: usize, count: usize) -> usize {
    first + usize::arbitrary(g) % (count - first)
}

fn gen_shape(g: &mut Gen, acyclic: bool) -> ShapeSpec {
    let count = 1 + usize::arbitrary(g) % MAX_NODES;
    let mut nodes = Vec::with_capacity(count);
    for index in 0..count {
        let first_target = if acyclic { index + 1 } else { 0 };
        let name = format!("T{}", index);
        if first_target >= count {
            nodes.push(ShapeNode {
                name,
                kind: NodeKind::Primitive(gen_primitive(g)),
                elements: Vec::new(),
            });
            continue;
        }

        let kind = match u8::arbitrary(g) % 4 {
            0 => NodeKind::Primitive(gen_primitive(g)),
            1 => NodeKind::Class,
            2 => NodeKind::List,
            _ => NodeKind::Map,
        };
        let elements = match kind {
            NodeKind::Primitive(_) => Vec::new(),
            NodeKind::Class => (0..usize::arbitrary(g) % (MAX_CLASS_ELEMENTS + 1))
                .map(|field| ShapeElement {
                    name: format!("f{}", field),
                    target: gen_target(g, first_target, count),
                    optional: bool::arbitrary(g),
                })
                .collect(),
            NodeKind::List => vec![ShapeElement {
                name: "0".to_string(),
                target: gen_target(g, first_target, count),
                optional: false,
            }],
            NodeKind::Map => (0..2)
                .map(|position: usize| ShapeElement {
                    name: position.to_string(),
                    target: gen_target(g, first_target, count),
                    optional: false,
                })
                .collect(),
        };
        nodes.push(ShapeNode { name, kind, elements });
    }
    ShapeSpec { nodes }
}

impl Arbitrary for ShapeSpec {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_shape(g, false)
    }
}

impl Arbitrary for AcyclicShape {
    fn arbitrary(g: &mut Gen) -> Self {
        AcyclicShape(gen_shape(g, true))
    }
}
