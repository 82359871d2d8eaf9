//! Resumable behavior tree engine with a shared blackboard.
//!
//! This library provides a small behavior tree interpreter for frame-driven
//! games: the tree is ticked once per time-step and long-running work
//! reports `Running` until it is done.
//!
//! - **Resumable**: composites remember where they stopped and resume there
//! - **Externalized state**: all progress lives on the [`Blackboard`], so one
//!   tree can be shared by many agents, each with its own blackboard
//! - **Contained faults**: a failing or panicking callback makes its leaf fail;
//!   it never unwinds through the tree
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes, identified by a [`NodeId`]
//! - [`Status`]: Success, Failure or Running
//! - [`Blackboard`]: Typed key/value store plus the [`Clock`] time source
//! - Leaf nodes: [`Condition`], [`Action`]
//! - Composite nodes: [`Sequence`], [`Selector`], [`Parallel`]
//! - Decorator nodes: [`Cooldown`], [`Repeater`], [`Wait`]
//! - [`BehaviorTreeBuilder`] and [`BehaviorTreeRunner`] to assemble and drive trees

pub mod behavior;
pub mod blackboard;
pub mod builder;
pub mod clock;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod runner;
pub mod status;
pub mod tree;
pub mod value;

// Re-export core types for ergonomic API
pub use behavior::{Behavior, NodeId};
pub use blackboard::{Blackboard, BlackboardKey};
pub use builder::BehaviorTreeBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use composite::{Parallel, Selector, Sequence};
pub use decorator::{Cooldown, Repeater, Repetitions, Wait};
pub use error::{BlackboardError, BuildError};
pub use leaf::{Action, Condition};
pub use runner::BehaviorTreeRunner;
pub use status::Status;
pub use tree::BehaviorTree;
pub use value::{FromValue, Value, ValueKind};
