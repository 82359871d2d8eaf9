//! Shared key/value store for behavior trees.
//!
//! The [`Blackboard`] is how nodes talk to each other and to the game around
//! them. It also holds every node's mid-execution progress (cursors,
//! counters, timestamps) under the node's private key namespace, which is
//! what makes ticking resumable and lets one tree serve many agents.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::BlackboardError;
use crate::value::{FromValue, Value};

/// A typed key/value store shared by the nodes of one tree instance.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blackboard {
    #[cfg_attr(feature = "serde", serde(flatten))]
    data: HashMap<String, Value>,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_clock"))]
    clock: Arc<dyn Clock>,
}

fn default_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock::new())
}

impl Blackboard {
    /// Creates an empty blackboard backed by a [`SystemClock`].
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Creates an empty blackboard reading time from `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            data: HashMap::new(),
            clock: Arc::new(clock),
        }
    }

    /// Current time in seconds, as seen by time-based nodes.
    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Reads `key` as `T`.
    ///
    /// Returns `None` if the key is absent or holds a different kind.
    pub fn get<T: FromValue>(&self, key: &str) -> Option<T> {
        self.data.get(key).and_then(T::from_value)
    }

    /// Reads `key` as `T`, falling back to `T::default()` when absent or
    /// of a different kind.
    pub fn get_or_default<T: FromValue + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }

    /// Reads `key` as `T`, reporting why the read failed.
    pub fn try_get<T: FromValue>(&self, key: &str) -> Result<T, BlackboardError> {
        let value = self
            .data
            .get(key)
            .ok_or_else(|| BlackboardError::Missing(key.to_owned()))?;

        T::from_value(value).ok_or_else(|| BlackboardError::TypeMismatch {
            key: key.to_owned(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    /// Borrows the raw value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Removes `key`, returning its value if it was set.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Removes every key that starts with `prefix`.
    pub fn clear_prefix(&mut self, prefix: &str) {
        self.data.retain(|key, _| !key.starts_with(prefix));
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blackboard")
            .field("data", &self.data)
            .field("now", &self.now())
            .finish()
    }
}

/// A typed handle to one blackboard entry.
///
/// Declaring keys once keeps names and types in sync between the code that
/// seeds the blackboard and the callbacks that read it.
///
/// ```
/// use blackboard_bt::{Blackboard, BlackboardKey};
///
/// const HEALTH: BlackboardKey<f64> = BlackboardKey::new("health");
///
/// let mut bb = Blackboard::new();
/// HEALTH.set(&mut bb, 42.0);
/// assert_eq!(HEALTH.get(&bb), Some(42.0));
/// ```
pub struct BlackboardKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BlackboardKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: FromValue> BlackboardKey<T> {
    pub fn get(&self, bb: &Blackboard) -> Option<T> {
        bb.get(self.name)
    }

    pub fn try_get(&self, bb: &Blackboard) -> Result<T, BlackboardError> {
        bb.try_get(self.name)
    }

    pub fn has(&self, bb: &Blackboard) -> bool {
        bb.has(self.name)
    }

    pub fn remove(&self, bb: &mut Blackboard) -> Option<Value> {
        bb.remove(self.name)
    }
}

impl<T: FromValue + Default> BlackboardKey<T> {
    pub fn get_or_default(&self, bb: &Blackboard) -> T {
        bb.get_or_default(self.name)
    }
}

impl<T: Into<Value>> BlackboardKey<T> {
    pub fn set(&self, bb: &mut Blackboard, value: T) {
        bb.set(self.name, value);
    }
}

impl<T> Clone for BlackboardKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BlackboardKey<T> {}

impl<T> fmt::Debug for BlackboardKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BlackboardKey").field(&self.name).finish()
    }
}
