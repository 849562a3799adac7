use super::visitor_trait::DescriptorVisitor;

/// Visitor backed by a plain function or closure.
///
/// `visit_descriptor(d)` returns `f(d)`. The wrapper adds no recursion and no
/// caching; a function that wants to descend calls `accept` on the children
/// itself.
#[derive(Debug, Clone)]
pub struct FnVisitor<F> {
    f: F,
}

impl<F> FnVisitor<F> {
    pub fn new(f: F) -> Self {
        FnVisitor { f }
    }

    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<D, R, F> DescriptorVisitor<D, R> for FnVisitor<F>
where
    F: FnMut(&D) -> R,
{
    fn visit_descriptor(&mut self, descriptor: &D) -> R {
        (self.f)(descriptor)
    }
}

/// Wraps `f` into a `DescriptorVisitor`.
pub fn visitor_fn<D, R, F>(f: F) -> FnVisitor<F>
where
    F: FnMut(&D) -> R,
{
    FnVisitor::new(f)
}
