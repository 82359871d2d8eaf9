//! Builder utilities for ergonomic behavior tree construction.
//!
//! Two styles are supported:
//!
//! - Shorthand constructors such as [`sequence`] and [`cooldown`] that take
//!   their children as arguments, so a decorator can never end up on the
//!   wrong node.
//! - The fluent [`BehaviorTreeBuilder`], which keeps a stack of open
//!   composites. `sequence()`, `selector()` and `parallel(n)` open a
//!   composite, `end()` closes it, and decorator calls wrap the node added
//!   immediately before them.
//!
//! ```
//! use blackboard_bt::{BehaviorTree, Status};
//!
//! let tree = BehaviorTree::builder()
//!     .sequence()
//!         .when("has_target")
//!         .action(|bb| {
//!             bb.set("moved", true);
//!             Status::Success
//!         })
//!     .end()
//!     .build()
//!     .unwrap();
//! assert!(!tree.is_empty());
//! ```

use std::borrow::Cow;

use crate::error::{BuildError, Result};
use crate::value::{FromValue, Value};
use crate::{
    Action, Behavior, BehaviorTree, BehaviorTreeRunner, Blackboard, Condition, Cooldown, Parallel,
    Repeater, Repetitions, Selector, Sequence, Status, Wait,
};

/// Creates a condition node.
///
/// Shorthand for `Box::new(Condition::new(predicate))`.
#[inline]
pub fn condition(
    predicate: impl Fn(&Blackboard) -> bool + Send + Sync + 'static,
) -> Box<dyn Behavior> {
    Box::new(Condition::new(predicate))
}

/// Creates an action node.
///
/// Shorthand for `Box::new(Action::new(action))`.
#[inline]
pub fn action(action: impl Fn(&mut Blackboard) -> Status + Send + Sync + 'static) -> Box<dyn Behavior> {
    Box::new(Action::new(action))
}

/// Creates a sequence node.
///
/// Shorthand for `Box::new(Sequence::new(children))`.
#[inline]
pub fn sequence(children: Vec<Box<dyn Behavior>>) -> Box<dyn Behavior> {
    Box::new(Sequence::new(children))
}

/// Creates a selector node.
///
/// Shorthand for `Box::new(Selector::new(children))`.
#[inline]
pub fn selector(children: Vec<Box<dyn Behavior>>) -> Box<dyn Behavior> {
    Box::new(Selector::new(children))
}

/// Creates a parallel node.
///
/// Shorthand for `Box::new(Parallel::new(success_threshold, children))`.
#[inline]
pub fn parallel(success_threshold: usize, children: Vec<Box<dyn Behavior>>) -> Box<dyn Behavior> {
    Box::new(Parallel::new(success_threshold, children))
}

/// Creates a cooldown decorator.
///
/// Shorthand for `Box::new(Cooldown::new(seconds, child))`.
#[inline]
pub fn cooldown(seconds: f64, child: Box<dyn Behavior>) -> Box<dyn Behavior> {
    Box::new(Cooldown::new(seconds, child))
}

/// Creates a repeater decorator.
///
/// Shorthand for `Box::new(Repeater::new(count, child))`.
#[inline]
pub fn repeat(count: impl Into<Repetitions>, child: Box<dyn Behavior>) -> Box<dyn Behavior> {
    Box::new(Repeater::new(count, child))
}

/// Creates a wait node.
///
/// Shorthand for `Box::new(Wait::new(seconds))`.
#[inline]
pub fn wait(seconds: f64) -> Box<dyn Behavior> {
    Box::new(Wait::new(seconds))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Sequence,
    Selector,
    Parallel(usize),
}

struct Frame {
    kind: FrameKind,
    children: Vec<Box<dyn Behavior>>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

/// Fluent, stack-based behavior tree builder.
///
/// Mistakes in the call chain (an `end()` with nothing open, a decorator
/// with nothing before it, composites left open) are remembered and
/// reported by [`build`](Self::build); the first one wins.
pub struct BehaviorTreeBuilder {
    blackboard: Blackboard,
    // Bottom frame is the root frame and is never popped.
    stack: Vec<Frame>,
    error: Option<BuildError>,
}

impl BehaviorTreeBuilder {
    pub fn new() -> Self {
        Self::with_blackboard(Blackboard::new())
    }

    /// Starts a builder whose runner will use `blackboard`.
    pub fn with_blackboard(blackboard: Blackboard) -> Self {
        Self {
            blackboard,
            stack: vec![Frame::new(FrameKind::Root)],
            error: None,
        }
    }

    /// Replaces the blackboard handed to [`build_runner`](Self::build_runner).
    pub fn blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = blackboard;
        self
    }

    /// Seeds values before the tree is built.
    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    fn current(&mut self) -> &mut Frame {
        // The root frame is never popped, so the stack is never empty.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn fail(&mut self, error: BuildError) {
        self.error.get_or_insert(error);
    }

    /// Appends an already-built node to the current composite.
    pub fn node(mut self, node: impl Behavior + 'static) -> Self {
        self.current().children.push(Box::new(node));
        self
    }

    /// Appends a boxed node to the current composite.
    pub fn boxed(mut self, node: Box<dyn Behavior>) -> Self {
        self.current().children.push(node);
        self
    }

    // ===== conditions =====

    pub fn condition(self, predicate: impl Fn(&Blackboard) -> bool + Send + Sync + 'static) -> Self {
        self.node(Condition::new(predicate))
    }

    pub fn try_condition(
        self,
        predicate: impl Fn(&Blackboard) -> anyhow::Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.node(Condition::try_new(predicate))
    }

    /// Succeeds when `key` holds `true`.
    pub fn when(self, key: impl Into<String>) -> Self {
        let key = key.into();
        let name = format!("when {key}");
        self.node(Condition::new(move |bb| bb.get_or_default::<bool>(&key)).named(name))
    }

    /// Succeeds when `key` does not hold `true` (including when unset).
    pub fn when_not(self, key: impl Into<String>) -> Self {
        let key = key.into();
        let name = format!("when not {key}");
        self.node(Condition::new(move |bb| !bb.get_or_default::<bool>(&key)).named(name))
    }

    /// Succeeds when `key` holds a value equal to `expected`.
    pub fn when_equals<T>(self, key: impl Into<String>, expected: T) -> Self
    where
        T: FromValue + PartialEq + Send + Sync + 'static,
    {
        let key = key.into();
        let name = format!("when {key} equals");
        self.node(
            Condition::new(move |bb| bb.get::<T>(&key).is_some_and(|v| v == expected)).named(name),
        )
    }

    /// Succeeds when the float at `key` is greater than `threshold`.
    pub fn when_greater_than(self, key: impl Into<String>, threshold: f64) -> Self {
        let key = key.into();
        let name = format!("when {key} > {threshold}");
        self.node(
            Condition::new(move |bb| bb.get::<f64>(&key).is_some_and(|v| v > threshold))
                .named(name),
        )
    }

    /// Succeeds when the float at `key` is less than `threshold`.
    pub fn when_less_than(self, key: impl Into<String>, threshold: f64) -> Self {
        let key = key.into();
        let name = format!("when {key} < {threshold}");
        self.node(
            Condition::new(move |bb| bb.get::<f64>(&key).is_some_and(|v| v < threshold))
                .named(name),
        )
    }

    // ===== actions =====

    pub fn action(self, action: impl Fn(&mut Blackboard) -> Status + Send + Sync + 'static) -> Self {
        self.node(Action::new(action))
    }

    pub fn try_action(
        self,
        action: impl Fn(&mut Blackboard) -> anyhow::Result<Status> + Send + Sync + 'static,
    ) -> Self {
        self.node(Action::try_new(action))
    }

    /// Runs `f` and succeeds.
    pub fn run(self, f: impl Fn(&mut Blackboard) + Send + Sync + 'static) -> Self {
        self.action(move |bb| {
            f(bb);
            Status::Success
        })
    }

    /// Stores `value` under `key` and succeeds.
    pub fn set(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        let name = format!("set {key}");
        self.node(
            Action::new(move |bb| {
                bb.set(key.as_str(), value.clone());
                Status::Success
            })
            .named(name),
        )
    }

    pub fn set_true(self, key: impl Into<String>) -> Self {
        self.set(key, true)
    }

    pub fn set_false(self, key: impl Into<String>) -> Self {
        self.set(key, false)
    }

    /// Logs `message` at info level and succeeds.
    pub fn log(self, message: impl Into<Cow<'static, str>>) -> Self {
        let message = message.into();
        self.run(move |_| tracing::info!("{message}"))
    }

    /// Logs the current value of `key` at info level and succeeds.
    pub fn log_value(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.run(move |bb| match bb.value(&key) {
            Some(value) => tracing::info!(key = %key, value = %value, "blackboard value"),
            None => tracing::info!(key = %key, "blackboard value unset"),
        })
    }

    /// Adds `amount` to the float at `key` (unset counts as zero) and
    /// succeeds.
    pub fn increment(self, key: impl Into<String>, amount: f64) -> Self {
        let key = key.into();
        self.run(move |bb| {
            let current = bb.get_or_default::<f64>(&key);
            bb.set(key.as_str(), current + amount);
        })
    }

    /// Subtracts `amount` from the float at `key` and succeeds.
    pub fn decrement(self, key: impl Into<String>, amount: f64) -> Self {
        self.increment(key, -amount)
    }

    /// Appends `item` to the list at `key`, creating it if needed, and
    /// succeeds.
    pub fn push_to_list(self, key: impl Into<String>, item: impl Into<Value>) -> Self {
        let key = key.into();
        let item = item.into();
        self.run(move |bb| {
            let mut list = bb.get::<Vec<Value>>(&key).unwrap_or_default();
            list.push(item.clone());
            bb.set(key.as_str(), list);
        })
    }

    /// Removes the first occurrence of `item` from the list at `key` and
    /// succeeds. A missing list is left missing.
    pub fn remove_from_list(self, key: impl Into<String>, item: impl Into<Value>) -> Self {
        let key = key.into();
        let item = item.into();
        self.run(move |bb| {
            if let Some(mut list) = bb.get::<Vec<Value>>(&key) {
                if let Some(pos) = list.iter().position(|v| *v == item) {
                    list.remove(pos);
                }
                bb.set(key.as_str(), list);
            }
        })
    }

    /// Adds a [`Wait`] node.
    pub fn wait(self, seconds: f64) -> Self {
        self.node(Wait::new(seconds))
    }

    // ===== composites =====

    /// Opens a [`Sequence`]; close it with [`end`](Self::end).
    pub fn sequence(mut self) -> Self {
        self.stack.push(Frame::new(FrameKind::Sequence));
        self
    }

    /// Opens a [`Selector`]; close it with [`end`](Self::end).
    pub fn selector(mut self) -> Self {
        self.stack.push(Frame::new(FrameKind::Selector));
        self
    }

    /// Opens a [`Parallel`]; close it with [`end`](Self::end).
    pub fn parallel(mut self, success_threshold: usize) -> Self {
        self.stack
            .push(Frame::new(FrameKind::Parallel(success_threshold)));
        self
    }

    /// Closes the innermost open composite and adds it to its parent.
    pub fn end(mut self) -> Self {
        if self.stack.len() == 1 {
            self.fail(BuildError::UnbalancedEnd);
            return self;
        }

        let Some(frame) = self.stack.pop() else {
            return self;
        };
        let node: Box<dyn Behavior> = match frame.kind {
            FrameKind::Sequence | FrameKind::Root => Box::new(Sequence::new(frame.children)),
            FrameKind::Selector => Box::new(Selector::new(frame.children)),
            FrameKind::Parallel(threshold) => Box::new(Parallel::new(threshold, frame.children)),
        };
        self.current().children.push(node);
        self
    }

    // ===== decorators =====

    fn decorate(
        mut self,
        decorator: &'static str,
        wrap: impl FnOnce(Box<dyn Behavior>) -> Box<dyn Behavior>,
    ) -> Self {
        let last = self.current().children.pop();
        match last {
            Some(last) => self.current().children.push(wrap(last)),
            None => self.fail(BuildError::DecoratorWithoutTarget { decorator }),
        }
        self
    }

    /// Wraps the previous node in a [`Cooldown`].
    pub fn cooldown(self, seconds: f64) -> Self {
        self.decorate("cooldown", |child| cooldown(seconds, child))
    }

    /// Wraps the previous node in a [`Repeater`]. Negative counts repeat
    /// forever.
    pub fn repeat(self, count: i32) -> Self {
        self.decorate("repeat", |child| repeat(count, child))
    }

    /// Wraps the previous node in a [`Repeater`] that never finishes.
    pub fn repeat_forever(self) -> Self {
        self.decorate("repeat", |child| repeat(Repetitions::Infinite, child))
    }

    // ===== finishing =====

    /// Finishes the tree.
    ///
    /// A single top-level node becomes the root as-is; several top-level
    /// nodes are wrapped in a [`Sequence`]. With no nodes the tree is empty.
    pub fn build(self) -> Result<BehaviorTree> {
        self.finish().map(|(tree, _)| tree)
    }

    /// Finishes the tree and pairs it with this builder's blackboard.
    pub fn build_runner(self) -> Result<BehaviorTreeRunner> {
        let (tree, blackboard) = self.finish()?;
        Ok(BehaviorTreeRunner::new(tree, blackboard))
    }

    fn finish(mut self) -> Result<(BehaviorTree, Blackboard)> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        if self.stack.len() > 1 {
            return Err(BuildError::UnclosedComposite {
                depth: self.stack.len() - 1,
            });
        }

        let mut children = std::mem::take(&mut self.current().children);
        let tree = match children.len() {
            0 => BehaviorTree::empty(),
            1 => BehaviorTree::from_boxed(children.remove(0)),
            _ => BehaviorTree::new(Sequence::new(children)),
        };
        tracing::debug!(root = ?tree.root().map(|r| r.id()), "behavior tree built");
        Ok((tree, self.blackboard))
    }
}

impl Default for BehaviorTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
