//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, which is the fundamental
//! abstraction for all behavior tree nodes, and [`NodeId`], the identity a
//! node uses to namespace its private state on the [`Blackboard`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Blackboard, Status};

/// Process-wide unique identity of a node instance.
///
/// Every stateful node keeps its progress in the blackboard under keys of
/// the form `"<id>_<slot>"`, so resetting a node is a prefix clear of
/// [`NodeId::prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    /// Allocates a fresh id. Never returns the same id twice in a process.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// The namespace prefix shared by all of this node's keys.
    pub fn prefix(self) -> String {
        format!("{self}_")
    }

    /// The blackboard key for one named piece of this node's state.
    pub fn key(self, slot: &str) -> String {
        format!("{self}_{slot}")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A behavior tree node that can be ticked against a blackboard.
///
/// Nodes are immutable once built: anything that must survive between ticks
/// is written to the blackboard. This lets a single tree be ticked against
/// several blackboards (one per agent) without the agents interfering.
pub trait Behavior: Send + Sync {
    /// The identity used to namespace this node's blackboard state.
    fn id(&self) -> NodeId;

    /// Evaluate this node for one time-step.
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed
    /// - `Status::Running` if it needs more time-steps
    fn tick(&self, bb: &mut Blackboard) -> Status;

    /// Discard any in-progress state of this node and its subtree.
    ///
    /// Must be idempotent and safe to call on a node that was never ticked.
    /// The default clears the node's own namespace.
    fn reset(&self, bb: &mut Blackboard) {
        bb.clear_prefix(&self.id().prefix());
    }
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior>` to also implement `Behavior`,
/// enabling dynamic dispatch and heterogeneous collections of nodes.
impl Behavior for Box<dyn Behavior> {
    #[inline]
    fn id(&self) -> NodeId {
        (**self).id()
    }

    #[inline]
    fn tick(&self, bb: &mut Blackboard) -> Status {
        (**self).tick(bb)
    }

    #[inline]
    fn reset(&self, bb: &mut Blackboard) {
        (**self).reset(bb)
    }
}
