//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors.
//! This module provides [`Sequence`] (AND logic), [`Selector`] (OR logic) and
//! [`Parallel`] (all children every tick, success by quorum).
//!
//! Sequence and Selector keep a cursor on the blackboard, so a child that
//! reports `Running` is resumed on the next tick instead of restarting the
//! whole list.

use crate::{Behavior, Blackboard, NodeId, Status};

/// Executes child behaviors in order until one fails.
///
/// # Semantics
///
/// A `Sequence` node evaluates its children from left to right, starting at
/// the child it stopped on last time:
/// - If a child returns `Running`, the sequence remembers that child and returns `Running`
/// - If a child returns `Failure`, the sequence **resets** and returns `Failure`
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence resets and returns `Success`
///
/// An empty sequence succeeds.
pub struct Sequence {
    id: NodeId,
    cursor_key: String,
    children: Vec<Box<dyn Behavior>>,
}

impl Sequence {
    /// Creates a new sequence with the given child behaviors.
    pub fn new(children: Vec<Box<dyn Behavior>>) -> Self {
        let id = NodeId::next();
        Self {
            id,
            cursor_key: id.key("current"),
            children,
        }
    }

    pub fn children(&self) -> &[Box<dyn Behavior>] {
        &self.children
    }
}

impl Behavior for Sequence {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        let status = run_from_cursor(&self.children, &self.cursor_key, Status::Failure, bb);
        if status.is_done() {
            self.reset(bb);
        }
        status
    }

    fn reset(&self, bb: &mut Blackboard) {
        reset_all(&self.children, bb);
        bb.clear_prefix(&self.id.prefix());
    }
}

/// Executes child behaviors in order until one succeeds.
///
/// # Semantics
///
/// A `Selector` node evaluates its children from left to right, starting at
/// the child it stopped on last time:
/// - If a child returns `Running`, the selector remembers that child and returns `Running`
/// - If a child returns `Success`, the selector **resets** and returns `Success`
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector resets and returns `Failure`
///
/// An empty selector fails.
pub struct Selector {
    id: NodeId,
    cursor_key: String,
    children: Vec<Box<dyn Behavior>>,
}

impl Selector {
    /// Creates a new selector with the given child behaviors.
    pub fn new(children: Vec<Box<dyn Behavior>>) -> Self {
        let id = NodeId::next();
        Self {
            id,
            cursor_key: id.key("current"),
            children,
        }
    }

    pub fn children(&self) -> &[Box<dyn Behavior>] {
        &self.children
    }
}

impl Behavior for Selector {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        let status = run_from_cursor(&self.children, &self.cursor_key, Status::Success, bb);
        if status.is_done() {
            self.reset(bb);
        }
        status
    }

    fn reset(&self, bb: &mut Blackboard) {
        reset_all(&self.children, bb);
        bb.clear_prefix(&self.id.prefix());
    }
}

/// Ticks children from the persisted cursor until one returns `stop_on` or
/// `Running`.
///
/// Returns `Running` with the cursor saved, `stop_on` when a child produced
/// it, or the opposite of `stop_on` once every child has been passed. The
/// caller is responsible for resetting on a terminal status.
fn run_from_cursor(
    children: &[Box<dyn Behavior>],
    cursor_key: &str,
    stop_on: Status,
    bb: &mut Blackboard,
) -> Status {
    let mut current = bb.get_or_default::<usize>(cursor_key);

    while let Some(child) = children.get(current) {
        match child.tick(bb) {
            Status::Running => {
                bb.set(cursor_key, current);
                return Status::Running;
            }
            status if status == stop_on => return stop_on,
            _ => current += 1,
        }
    }

    match stop_on {
        Status::Failure => Status::Success,
        _ => Status::Failure,
    }
}

fn reset_all(children: &[Box<dyn Behavior>], bb: &mut Blackboard) {
    for child in children {
        child.reset(bb);
    }
}

/// Ticks every child on every tick and succeeds once enough of them do.
///
/// # Semantics
///
/// - All children are ticked in order each tick; there is no cursor
/// - If a child returns `Failure`, the parallel resets and returns `Failure`
///   right away (later children are not ticked this time)
/// - If at least `success_threshold` children returned `Success` this tick,
///   the parallel resets and returns `Success`
/// - Otherwise it returns `Running`
///
/// A threshold larger than the number of children can never be met; such a
/// node keeps returning `Running` until it fails or an ancestor resets it.
pub struct Parallel {
    id: NodeId,
    success_threshold: usize,
    children: Vec<Box<dyn Behavior>>,
}

impl Parallel {
    /// Creates a new parallel node.
    pub fn new(success_threshold: usize, children: Vec<Box<dyn Behavior>>) -> Self {
        let id = NodeId::next();
        if success_threshold > children.len() {
            tracing::warn!(
                node = %id,
                success_threshold,
                children = children.len(),
                "parallel success threshold is unreachable"
            );
        }
        Self {
            id,
            success_threshold,
            children,
        }
    }

    pub fn success_threshold(&self) -> usize {
        self.success_threshold
    }

    pub fn children(&self) -> &[Box<dyn Behavior>] {
        &self.children
    }
}

impl Behavior for Parallel {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        let mut successes = 0;
        for child in &self.children {
            match child.tick(bb) {
                Status::Failure => {
                    self.reset(bb);
                    return Status::Failure;
                }
                Status::Success => successes += 1,
                Status::Running => {}
            }
        }

        if successes >= self.success_threshold {
            self.reset(bb);
            return Status::Success;
        }

        Status::Running
    }

    fn reset(&self, bb: &mut Blackboard) {
        reset_all(&self.children, bb);
        bb.clear_prefix(&self.id.prefix());
    }
}
