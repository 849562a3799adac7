use tracing::trace;

use crate::descriptor::SerialDescriptor;
use crate::error::DescriptorError;
use crate::traversal::{CyclePolicy, DescriptorFold, DescriptorWalker, ElementResult, WalkConfig};

/// Renders a descriptor graph as an indented tree:
///
/// ```text
/// Person (class)
///   name: String (string)
///   nickname: String? (string) [optional]
///   friends: List<Person> (list)
///     0: Person (class) <recursive>
/// ```
#[derive(Debug, Clone)]
pub struct PrettyPrinter {
    /// Spaces added per nesting level.
    indent: usize,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        PrettyPrinter { indent: 2 }
    }
}

impl PrettyPrinter {
    pub fn new(indent: usize) -> Self {
        PrettyPrinter { indent }
    }

    pub fn render<D: SerialDescriptor>(&mut self, root: &D) -> Result<String, DescriptorError> {
        let walker = DescriptorWalker::new(WalkConfig::new().with_cycle_policy(CyclePolicy::Reference));
        let lines = walker.walk(root, self)?;
        trace!("Rendered {} lines for {}", lines.len(), root.serial_name());
        Ok(lines.join("\n"))
    }
}

/// Renders `root` with the default indentation.
pub fn render<D: SerialDescriptor>(root: &D) -> Result<String, DescriptorError> {
    PrettyPrinter::default().render(root)
}

impl<D: SerialDescriptor> DescriptorFold<D> for PrettyPrinter {
    type Output = Vec<String>;
    type Error = DescriptorError;

    fn combine(&mut self, descriptor: &D, elements: Vec<ElementResult<Vec<String>>>) -> Result<Vec<String>, DescriptorError> {
        let pad = " ".repeat(self.indent);
        let mut lines = vec![format!("{} ({})", descriptor.serial_name(), descriptor.kind())];
        for element in elements {
            let suffix = if element.optional { " [optional]" } else { "" };
            let mut child = element.value.into_iter();
            if let Some(header) = child.next() {
                lines.push(format!("{}{}: {}{}", pad, element.name, header, suffix));
            }
            lines.extend(child.map(|line| format!("{}{}", pad, line)));
        }
        Ok(lines)
    }

    fn reference(&mut self, descriptor: &D) -> Result<Vec<String>, DescriptorError> {
        Ok(vec![format!("{} ({}) <recursive>", descriptor.serial_name(), descriptor.kind())])
    }
}
