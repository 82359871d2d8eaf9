//! Status returned by behavior nodes.

/// The result of ticking a behavior node.
///
/// # Frame-based Semantics
///
/// A node is ticked once per external time-step. Work that spans several
/// time-steps reports [`Status::Running`] and is ticked again on the next
/// step with the same blackboard; its progress lives in the blackboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The behavior completed successfully.
    ///
    /// For conditions: the predicate held.
    /// For actions: the action finished its work.
    Success,

    /// The behavior failed.
    ///
    /// For conditions: the predicate did not hold (or faulted).
    /// For actions: the action could not be carried out (or faulted).
    Failure,

    /// The behavior has not finished yet; tick it again next time-step.
    Running,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_done(self) -> bool {
        !self.is_running()
    }
}

impl From<bool> for Status {
    /// `true` maps to `Success`, `false` to `Failure`.
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
