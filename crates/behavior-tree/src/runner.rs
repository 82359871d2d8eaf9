//! Drives a tree once per external time-step.

use crate::{BehaviorTree, Blackboard, Status};

/// Pairs a [`BehaviorTree`] with one agent's [`Blackboard`] and a
/// started/stopped flag.
///
/// A stopped runner reports `Failure` without touching the tree, which is
/// indistinguishable from a failing tree by status alone; check
/// [`is_running`](Self::is_running) when the difference matters.
#[derive(Debug)]
pub struct BehaviorTreeRunner {
    tree: BehaviorTree,
    blackboard: Blackboard,
    running: bool,
}

impl BehaviorTreeRunner {
    /// Creates a stopped runner.
    pub fn new(tree: BehaviorTree, blackboard: Blackboard) -> Self {
        Self {
            tree,
            blackboard,
            running: false,
        }
    }

    pub fn start(&mut self) {
        tracing::debug!(tree = ?self.tree, "behavior tree started");
        self.running = true;
    }

    /// Stops ticking and discards all in-progress state of the tree.
    pub fn stop(&mut self) {
        tracing::debug!(tree = ?self.tree, "behavior tree stopped");
        self.running = false;
        self.tree.reset(&mut self.blackboard);
    }

    /// Ticks the tree once.
    pub fn tick(&mut self) -> Status {
        if !self.running {
            return Status::Failure;
        }

        let status = self.tree.tick(&mut self.blackboard);
        tracing::trace!(?status, "behavior tree ticked");
        status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tree(&self) -> &BehaviorTree {
        &self.tree
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }
}
