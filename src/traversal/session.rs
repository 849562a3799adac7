use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Progress of one descriptor within a traversal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Unvisited,
    /// Entered and not yet exited; reaching it again means a cycle.
    OnStack,
    /// Exited at least once. Reaching it again is sharing, not a cycle.
    Completed,
}

#[derive(Debug, Clone)]
struct Frame<Id> {
    id: Id,
    label: String,
}

/// Identity tracking for one root traversal.
///
/// A session is created when a root walk starts and dropped when it returns.
/// It is never shared between walks: descriptors are immutable and can be read
/// by any number of traversals at once, but the on-stack set is per walk.
#[derive(Debug)]
pub struct TraversalSession<Id> {
    on_stack: FxHashSet<Id>,
    path: Vec<Frame<Id>>,
    completed: FxHashSet<Id>,
}

impl<Id> Default for TraversalSession<Id> {
    fn default() -> Self {
        TraversalSession {
            on_stack: FxHashSet::default(),
            path: Vec::new(),
            completed: FxHashSet::default(),
        }
    }
}

impl<Id: Copy + Eq + Hash + fmt::Debug> TraversalSession<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &Id) -> VisitState {
        if self.on_stack.contains(id) {
            VisitState::OnStack
        } else if self.completed.contains(id) {
            VisitState::Completed
        } else {
            VisitState::Unvisited
        }
    }

    pub fn is_on_stack(&self, id: &Id) -> bool {
        self.on_stack.contains(id)
    }

    /// Number of descriptors currently being expanded.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Pushes `id` onto the stack. Returns false and leaves the session
    /// untouched if `id` is already on the stack.
    pub fn enter(&mut self, id: Id, label: impl Into<String>) -> bool {
        if !self.on_stack.insert(id) {
            return false;
        }
        self.path.push(Frame {
            id,
            label: label.into(),
        });
        true
    }

    /// Pops `id`, which must be the most recently entered identity.
    pub fn exit(&mut self, id: Id) {
        let frame = self.path.pop();
        debug_assert!(
            frame.as_ref().is_some_and(|frame| frame.id == id),
            "session exit out of order: expected {:?}, found {:?}",
            id,
            frame.map(|frame| frame.id)
        );
        self.on_stack.remove(&id);
        self.completed.insert(id);
    }

    /// Labels of the current path, root first.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.path.iter().map(|frame| frame.label.as_str())
    }

    /// Labels from the frame of `id` to the top of the stack. Empty when `id`
    /// is not on the stack.
    pub fn cycle_path(&self, id: &Id) -> Vec<String> {
        match self.path.iter().position(|frame| frame.id == *id) {
            Some(start) => self.path[start..].iter().map(|frame| frame.label.clone()).collect(),
            None => Vec::new(),
        }
    }
}
