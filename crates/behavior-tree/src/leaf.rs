//! Leaf behavior nodes.
//!
//! Leaves wrap user callbacks: [`Condition`] asks a question about the
//! blackboard, [`Action`] does work and reports how far it got. A callback
//! that returns an error or panics is contained at the leaf: the fault is
//! logged and the leaf reports `Failure`, so the rest of the tree keeps its
//! normal control flow.

use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use crate::{Behavior, Blackboard, NodeId, Status};

type Predicate = Box<dyn Fn(&Blackboard) -> anyhow::Result<bool> + Send + Sync>;
type ActionFn = Box<dyn Fn(&mut Blackboard) -> anyhow::Result<Status> + Send + Sync>;

/// Succeeds when its predicate holds, fails otherwise.
pub struct Condition {
    id: NodeId,
    name: Cow<'static, str>,
    predicate: Predicate,
}

impl Condition {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Blackboard) -> bool + Send + Sync + 'static,
    {
        Self::try_new(move |bb| Ok(predicate(bb)))
    }

    /// Creates a condition whose predicate may fail; an `Err` counts as
    /// `Failure`.
    pub fn try_new<F>(predicate: F) -> Self
    where
        F: Fn(&Blackboard) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            id: NodeId::next(),
            name: Cow::Borrowed("condition"),
            predicate: Box::new(predicate),
        }
    }

    /// Sets the name reported in fault logs.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Behavior for Condition {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        let bb = &*bb;
        match contain(self.id, &self.name, || (self.predicate)(bb)) {
            Some(held) => Status::from(held),
            None => Status::Failure,
        }
    }
}

/// Runs a callback and returns the status it reports.
pub struct Action {
    id: NodeId,
    name: Cow<'static, str>,
    action: ActionFn,
}

impl Action {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&mut Blackboard) -> Status + Send + Sync + 'static,
    {
        Self::try_new(move |bb| Ok(action(bb)))
    }

    /// Creates an action whose callback may fail; an `Err` counts as
    /// `Failure`.
    pub fn try_new<F>(action: F) -> Self
    where
        F: Fn(&mut Blackboard) -> anyhow::Result<Status> + Send + Sync + 'static,
    {
        Self {
            id: NodeId::next(),
            name: Cow::Borrowed("action"),
            action: Box::new(action),
        }
    }

    /// Sets the name reported in fault logs.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Behavior for Action {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        contain(self.id, &self.name, || (self.action)(bb)).unwrap_or(Status::Failure)
    }
}

/// Runs a leaf callback, turning errors and panics into a logged `None`.
fn contain<T>(id: NodeId, name: &str, f: impl FnOnce() -> anyhow::Result<T>) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            tracing::error!(node = %id, leaf = name, error = %err, "leaf callback failed");
            None
        }
        Err(payload) => {
            tracing::error!(
                node = %id,
                leaf = name,
                panic = panic_message(payload.as_ref()),
                "leaf callback panicked"
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}
