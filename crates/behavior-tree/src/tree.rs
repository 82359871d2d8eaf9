//! Built behavior trees.

use std::fmt;
use std::sync::Arc;

use crate::{Behavior, BehaviorTreeBuilder, Blackboard, Status};

/// An immutable behavior tree.
///
/// Cloning is cheap and shares the nodes, so one tree definition can drive
/// any number of agents as long as each ticks it with its own blackboard.
/// A tree built from no nodes is empty and always fails.
#[derive(Clone, Default)]
pub struct BehaviorTree {
    root: Option<Arc<dyn Behavior>>,
}

impl BehaviorTree {
    /// Starts a [`BehaviorTreeBuilder`].
    pub fn builder() -> BehaviorTreeBuilder {
        BehaviorTreeBuilder::new()
    }

    pub fn new(root: impl Behavior + 'static) -> Self {
        Self {
            root: Some(Arc::new(root)),
        }
    }

    pub fn from_boxed(root: Box<dyn Behavior>) -> Self {
        Self {
            root: Some(Arc::from(root)),
        }
    }

    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&dyn Behavior> {
        self.root.as_deref()
    }

    /// Ticks the root once. An empty tree fails without doing anything.
    pub fn tick(&self, bb: &mut Blackboard) -> Status {
        match &self.root {
            Some(root) => root.tick(bb),
            None => Status::Failure,
        }
    }

    /// Resets the whole tree's progress on `bb`.
    pub fn reset(&self, bb: &mut Blackboard) {
        if let Some(root) = &self.root {
            root.reset(bb);
        }
    }
}

impl fmt::Debug for BehaviorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("root", &self.root.as_ref().map(|root| root.id()))
            .finish()
    }
}
