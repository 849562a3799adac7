use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::config::{CyclePolicy, WalkConfig};
use super::session::TraversalSession;
use crate::descriptor::SerialDescriptor;
use crate::error::DescriptorError;
use crate::visitor::{Accept, DescriptorVisitor};

/// Result computed for one element of a composite descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementResult<O> {
    pub index: usize,
    pub name: String,
    pub optional: bool,
    pub value: O,
}

/// Combination policy plugged into a `DescriptorWalker`.
///
/// The walker hands `combine` the parent descriptor together with the results
/// of all its elements, in index order. Leaves get an empty element list.
pub trait DescriptorFold<D: SerialDescriptor> {
    type Output;
    type Error: From<DescriptorError>;

    fn combine(
        &mut self,
        descriptor: &D,
        elements: Vec<ElementResult<Self::Output>>,
    ) -> Result<Self::Output, Self::Error>;

    /// Result substituted for a descriptor reached while it is still being
    /// expanded, under `CyclePolicy::Reference`.
    fn reference(&mut self, descriptor: &D) -> Result<Self::Output, Self::Error> {
        Err(DescriptorError::ReferenceUnsupported {
            serial_name: descriptor.serial_name().to_string(),
        }
        .into())
    }

    /// Called before each element is visited. Returning an error stops the
    /// walk, which makes this the place to check for cancellation.
    fn before_element(&mut self, _parent: &D, _index: usize) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Recursive, cycle-safe driver for `DescriptorFold`s.
///
/// Every call to `walk` runs with a fresh `TraversalSession`, so one walker can
/// serve any number of sequential or concurrent walks.
#[derive(Debug, Clone, Default)]
pub struct DescriptorWalker {
    config: WalkConfig,
}

impl DescriptorWalker {
    pub fn new(config: WalkConfig) -> Self {
        DescriptorWalker { config }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walks the graph below `root`. Shared descriptors are expanded once per
    /// path that reaches them.
    pub fn walk<D, F>(&self, root: &D, fold: &mut F) -> Result<F::Output, F::Error>
    where
        D: SerialDescriptor,
        F: DescriptorFold<D>,
    {
        let mut walk = Walk::new(fold, &self.config, None);
        let result: Result<F::Output, F::Error> = root.accept(&mut walk);
        walk.finish(root);
        result
    }

    /// Like `walk`, but a descriptor whose expansion completed without hitting
    /// a cycle is expanded only once; later occurrences reuse a clone of the
    /// first result.
    pub fn walk_memoized<D, F>(&self, root: &D, fold: &mut F) -> Result<F::Output, F::Error>
    where
        D: SerialDescriptor,
        F: DescriptorFold<D>,
        F::Output: Clone,
    {
        let memo = Memo {
            results: FxHashMap::default(),
            clone: <F::Output as Clone>::clone,
            hits: 0,
        };
        let mut walk = Walk::new(fold, &self.config, Some(memo));
        let result: Result<F::Output, F::Error> = root.accept(&mut walk);
        walk.finish(root);
        result
    }
}

/// Walks `root` with the default configuration (cycles are errors).
pub fn walk<D, F>(root: &D, fold: &mut F) -> Result<F::Output, F::Error>
where
    D: SerialDescriptor,
    F: DescriptorFold<D>,
{
    DescriptorWalker::default().walk(root, fold)
}

/// Completed results by identity, each with the height of the subtree that
/// produced it so a hit can still be checked against the depth limit.
struct Memo<Id, O> {
    results: FxHashMap<Id, (O, usize)>,
    clone: fn(&O) -> O,
    hits: usize,
}

/// State of one root walk. Recursion goes through `accept`, with the walk
/// itself as the visitor of every element.
struct Walk<'w, D: SerialDescriptor, F: DescriptorFold<D>> {
    fold: &'w mut F,
    config: &'w WalkConfig,
    session: TraversalSession<D::Id>,
    memo: Option<Memo<D::Id, F::Output>>,
    visited: usize,
    cycles: usize,
    /// Deepest stack depth reached inside the descriptor being expanded.
    deepest: usize,
}

impl<'w, D, F> Walk<'w, D, F>
where
    D: SerialDescriptor,
    F: DescriptorFold<D>,
{
    fn new(fold: &'w mut F, config: &'w WalkConfig, memo: Option<Memo<D::Id, F::Output>>) -> Self {
        Walk {
            fold,
            config,
            session: TraversalSession::new(),
            memo,
            visited: 0,
            cycles: 0,
            deepest: 0,
        }
    }

    fn descend(&mut self, descriptor: &D) -> Result<F::Output, F::Error> {
        let count = descriptor.elements_count();
        let mut elements = Vec::with_capacity(count);
        for index in 0..count {
            self.fold.before_element(descriptor, index)?;
            let element = descriptor.element_descriptor(index)?;
            let visited: Result<F::Output, F::Error> = element.accept(self);
            elements.push(ElementResult {
                index,
                name: descriptor.element_name(index)?.to_string(),
                optional: descriptor.is_element_optional(index)?,
                value: visited?,
            });
        }
        self.fold.combine(descriptor, elements)
    }

    fn on_cycle(&mut self, descriptor: &D) -> Result<F::Output, F::Error> {
        self.cycles += 1;
        debug!(
            "Cycle detected at {} (depth {}, policy {:?})",
            descriptor.serial_name(),
            self.session.depth(),
            self.config.cycle_policy
        );
        match self.config.cycle_policy {
            CyclePolicy::Fail => {
                let mut path = self.session.cycle_path(&descriptor.identity());
                path.push(descriptor.serial_name().to_string());
                Err(DescriptorError::CyclicSchema {
                    serial_name: descriptor.serial_name().to_string(),
                    path,
                }
                .into())
            }
            CyclePolicy::Reference => self.fold.reference(descriptor),
        }
    }

    fn finish(&self, root: &D) {
        debug_assert!(self.session.is_idle());
        debug!(
            "Walked {}: {} expansions, {} distinct descriptors, {} cycles, {} memo hits",
            root.serial_name(),
            self.visited,
            self.session.completed_count(),
            self.cycles,
            self.memo.as_ref().map_or(0, |memo| memo.hits)
        );
    }
}

impl<D, F> DescriptorVisitor<D, Result<F::Output, F::Error>> for Walk<'_, D, F>
where
    D: SerialDescriptor,
    F: DescriptorFold<D>,
{
    fn visit_descriptor(&mut self, descriptor: &D) -> Result<F::Output, F::Error> {
        let id = descriptor.identity();
        if self.session.is_on_stack(&id) {
            return self.on_cycle(descriptor);
        }

        let depth = self.session.depth();
        if let Some(limit) = self.config.max_depth {
            if depth >= limit {
                return Err(DescriptorError::DepthLimitExceeded {
                    serial_name: descriptor.serial_name().to_string(),
                    limit,
                }
                .into());
            }
        }

        if let Some(memo) = &mut self.memo {
            if let Some((hit, height)) = memo.results.get(&id) {
                // A hit that would not fit under the limit here is expanded
                // again so the walk fails where a plain walk would.
                if self.config.max_depth.is_none_or(|limit| depth + height <= limit) {
                    memo.hits += 1;
                    self.deepest = self.deepest.max(depth + height);
                    trace!("Reusing result for {}", descriptor.serial_name());
                    return Ok((memo.clone)(hit));
                }
            }
        }

        self.session.enter(id, descriptor.serial_name());
        self.visited += 1;
        trace!(
            "Entering {} ({}) at depth {}",
            descriptor.serial_name(),
            descriptor.kind(),
            self.session.depth()
        );

        let cycles_before = self.cycles;
        let outer_deepest = std::mem::replace(&mut self.deepest, depth + 1);
        let result = self.descend(descriptor);
        self.session.exit(id);
        let height = self.deepest - depth;
        self.deepest = self.deepest.max(outer_deepest);
        let output = result?;

        if self.cycles == cycles_before {
            if let Some(memo) = &mut self.memo {
                let stored = (memo.clone)(&output);
                memo.results.insert(id, (stored, height));
            }
        }
        Ok(output)
    }
}
