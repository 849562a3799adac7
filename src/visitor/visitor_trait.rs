use super::adapter::FnVisitor;
use crate::descriptor::SerialDescriptor;

/// Computes a result of type `R` from a single descriptor.
///
/// Implementors may keep state between calls (accumulation buffers, symbol
/// tables), which is why the method takes `&mut self`. Failure, if any, is
/// expressed through `R` itself, e.g. `R = Result<T, E>`.
pub trait DescriptorVisitor<D, R> {
    fn visit_descriptor(&mut self, descriptor: &D) -> R;
}

/// Visits `descriptor` with `visitor`.
///
/// Exactly `visitor.visit_descriptor(descriptor)`.
pub fn accept<D, R, V>(descriptor: &D, visitor: &mut V) -> R
where
    V: DescriptorVisitor<D, R> + ?Sized,
{
    visitor.visit_descriptor(descriptor)
}

/// Method-call form of `accept` for every descriptor type.
pub trait Accept: SerialDescriptor {
    fn accept<R, V>(&self, visitor: &mut V) -> R
    where
        V: DescriptorVisitor<Self, R> + ?Sized,
    {
        accept(self, visitor)
    }

    /// Visits `self` with a visitor made out of `f`.
    fn accept_fn<R, F>(&self, f: F) -> R
    where
        F: FnMut(&Self) -> R,
    {
        accept(self, &mut FnVisitor::new(f))
    }
}

impl<D: SerialDescriptor> Accept for D {}
