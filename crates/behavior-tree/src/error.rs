//! Error types raised by the engine.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors surfaced by typed blackboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackboardError {
    #[error("blackboard key `{0}` is not set")]
    Missing(String),

    #[error("blackboard key `{key}` holds a {found} value, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Errors reported by [`BehaviorTreeBuilder::build`](crate::BehaviorTreeBuilder::build).
///
/// The builder records the first misuse it sees and keeps accepting calls,
/// so a fluent chain never has to be broken up to handle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("`end()` called with no open composite")]
    UnbalancedEnd,

    #[error("{depth} composite(s) still open at build time; missing `end()`")]
    UnclosedComposite { depth: usize },

    #[error("`{decorator}` has no preceding node to decorate in the current composite")]
    DecoratorWithoutTarget { decorator: &'static str },
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
