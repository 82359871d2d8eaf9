//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and modify its result or timing.
//! This module provides [`Cooldown`] (rate limiting), [`Repeater`] (looping)
//! and the childless [`Wait`] timer.
//!
//! Time is read from [`Blackboard::now`], so every decorator here is driven
//! by the clock installed in the blackboard it is ticked against.

use crate::{Behavior, Blackboard, NodeId, Status};

/// Gates its child so it can succeed at most once per cooldown window.
///
/// # Semantics
///
/// - If the child succeeded less than `cooldown` seconds ago, returns
///   `Failure` **without ticking the child**
/// - Otherwise ticks the child and returns its result unchanged, recording
///   the time if it was `Success`
///
/// Resetting a cooldown resets its child but keeps the last-success time:
/// the window still applies after the tree restarts.
pub struct Cooldown {
    id: NodeId,
    cooldown: f64,
    last_key: String,
    child: Box<dyn Behavior>,
}

impl Cooldown {
    /// Creates a cooldown of `cooldown` seconds around `child`.
    pub fn new(cooldown: f64, child: Box<dyn Behavior>) -> Self {
        let id = NodeId::next();
        Self {
            id,
            cooldown,
            last_key: id.key("last"),
            child,
        }
    }

    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }
}

impl Behavior for Cooldown {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        let now = bb.now();
        if let Some(last) = bb.get::<f64>(&self.last_key)
            && now - last < self.cooldown
        {
            return Status::Failure;
        }

        let status = self.child.tick(bb);
        if status.is_success() {
            bb.set(self.last_key.as_str(), now);
        }
        status
    }

    fn reset(&self, bb: &mut Blackboard) {
        self.child.reset(bb);
    }
}

/// How many times a [`Repeater`] runs its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetitions {
    /// Loop forever; the repeater never finishes on its own.
    Infinite,
    /// Run the child this many times, then report its last result.
    Finite(u32),
}

impl From<i32> for Repetitions {
    /// Negative counts mean "forever".
    fn from(count: i32) -> Self {
        match u32::try_from(count) {
            Ok(n) => Repetitions::Finite(n),
            Err(_) => Repetitions::Infinite,
        }
    }
}

/// Runs its child repeatedly.
///
/// # Semantics
///
/// - A `Running` child makes the repeater return `Running`
/// - Each time the child finishes, the run is counted and the child is reset
/// - Until the requested number of runs is reached (or forever), the
///   repeater returns `Running`
/// - On the final run it returns the child's result and rewinds its counter
pub struct Repeater {
    id: NodeId,
    repetitions: Repetitions,
    count_key: String,
    child: Box<dyn Behavior>,
}

impl Repeater {
    pub fn new(repetitions: impl Into<Repetitions>, child: Box<dyn Behavior>) -> Self {
        let id = NodeId::next();
        Self {
            id,
            repetitions: repetitions.into(),
            count_key: id.key("count"),
            child,
        }
    }

    pub fn forever(child: Box<dyn Behavior>) -> Self {
        Self::new(Repetitions::Infinite, child)
    }

    pub fn repetitions(&self) -> Repetitions {
        self.repetitions
    }
}

impl Behavior for Repeater {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        let status = self.child.tick(bb);
        if status.is_running() {
            return Status::Running;
        }

        let completed = bb.get_or_default::<i64>(&self.count_key) + 1;
        self.child.reset(bb);

        let more = match self.repetitions {
            Repetitions::Infinite => true,
            Repetitions::Finite(n) => completed < i64::from(n),
        };
        if more {
            bb.set(self.count_key.as_str(), completed);
            return Status::Running;
        }

        bb.set(self.count_key.as_str(), 0_i64);
        status
    }

    fn reset(&self, bb: &mut Blackboard) {
        self.child.reset(bb);
        bb.clear_prefix(&self.id.prefix());
    }
}

/// Returns `Running` until `duration` seconds have passed since its first
/// tick, then `Success` once.
///
/// The first tick always returns `Running`, even for a zero duration. After
/// succeeding the timer re-arms on the next tick.
pub struct Wait {
    id: NodeId,
    duration: f64,
    start_key: String,
    started_key: String,
}

impl Wait {
    pub fn new(duration: f64) -> Self {
        let id = NodeId::next();
        Self {
            id,
            duration,
            start_key: id.key("start"),
            started_key: id.key("started"),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

impl Behavior for Wait {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tick(&self, bb: &mut Blackboard) -> Status {
        let now = bb.now();
        if !bb.get_or_default::<bool>(&self.started_key) {
            bb.set(self.start_key.as_str(), now);
            bb.set(self.started_key.as_str(), true);
            return Status::Running;
        }

        let start = bb.get::<f64>(&self.start_key).unwrap_or(now);
        if now - start < self.duration {
            return Status::Running;
        }

        bb.set(self.started_key.as_str(), false);
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{Action, ManualClock};

    fn counting(status: Status) -> (Box<dyn Behavior>, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let node = Action::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            status
        });
        (Box::new(node), ticks)
    }

    #[test]
    fn cooldown_gates_child_inside_window() {
        let clock = ManualClock::new();
        let mut bb = Blackboard::with_clock(clock.clone());
        let (child, ticks) = counting(Status::Success);
        let cooldown = Cooldown::new(2.0, child);

        assert_eq!(cooldown.tick(&mut bb), Status::Success);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        clock.set(1.0);
        assert_eq!(cooldown.tick(&mut bb), Status::Failure);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        clock.set(2.1);
        assert_eq!(cooldown.tick(&mut bb), Status::Success);
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cooldown_passes_failure_without_arming() {
        let clock = ManualClock::new();
        let mut bb = Blackboard::with_clock(clock.clone());
        let (child, ticks) = counting(Status::Failure);
        let cooldown = Cooldown::new(5.0, child);

        assert_eq!(cooldown.tick(&mut bb), Status::Failure);
        clock.advance(0.1);
        assert_eq!(cooldown.tick(&mut bb), Status::Failure);
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cooldown_survives_reset() {
        let clock = ManualClock::new();
        let mut bb = Blackboard::with_clock(clock.clone());
        let (child, ticks) = counting(Status::Success);
        let cooldown = Cooldown::new(2.0, child);

        assert_eq!(cooldown.tick(&mut bb), Status::Success);
        cooldown.reset(&mut bb);

        clock.set(1.0);
        assert_eq!(cooldown.tick(&mut bb), Status::Failure);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeater_reports_final_result_on_last_run() {
        let (child, ticks) = counting(Status::Success);
        let repeater = Repeater::new(3, child);
        let mut bb = Blackboard::new();

        assert_eq!(repeater.tick(&mut bb), Status::Running);
        assert_eq!(repeater.tick(&mut bb), Status::Running);
        assert_eq!(repeater.tick(&mut bb), Status::Success);
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        // Counter rewound: the next cycle starts over.
        assert_eq!(repeater.tick(&mut bb), Status::Running);
    }

    #[test]
    fn repeater_does_not_count_running_child() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let child = Action::new(move |_| {
            // Alternates Running, Success.
            if counter.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Status::Running
            } else {
                Status::Success
            }
        });
        let repeater = Repeater::new(2, Box::new(child));
        let mut bb = Blackboard::new();

        let statuses: Vec<Status> = (0..4).map(|_| repeater.tick(&mut bb)).collect();
        assert_eq!(
            statuses,
            vec![Status::Running, Status::Running, Status::Running, Status::Success]
        );
    }

    #[test]
    fn repeater_forever_never_finishes() {
        let (child, _) = counting(Status::Failure);
        let repeater = Repeater::forever(child);
        let mut bb = Blackboard::new();

        for _ in 0..10 {
            assert_eq!(repeater.tick(&mut bb), Status::Running);
        }
        assert_eq!(repeater.repetitions(), Repetitions::Infinite);
    }

    #[test]
    fn negative_count_means_forever() {
        assert_eq!(Repetitions::from(-1), Repetitions::Infinite);
        assert_eq!(Repetitions::from(4), Repetitions::Finite(4));
    }

    #[test]
    fn repeater_reset_rewinds_counter() {
        let (child, _) = counting(Status::Success);
        let repeater = Repeater::new(2, child);
        let mut bb = Blackboard::new();

        assert_eq!(repeater.tick(&mut bb), Status::Running);
        repeater.reset(&mut bb);
        assert_eq!(repeater.tick(&mut bb), Status::Running);
        assert_eq!(repeater.tick(&mut bb), Status::Success);
    }

    #[test]
    fn wait_runs_until_duration_elapses() {
        let clock = ManualClock::new();
        let mut bb = Blackboard::with_clock(clock.clone());
        let wait = Wait::new(1.0);

        assert_eq!(wait.tick(&mut bb), Status::Running);
        clock.set(0.5);
        assert_eq!(wait.tick(&mut bb), Status::Running);
        clock.set(1.0);
        assert_eq!(wait.tick(&mut bb), Status::Success);

        // Re-armed: the next tick starts a fresh wait.
        assert_eq!(wait.tick(&mut bb), Status::Running);
        clock.set(1.9);
        assert_eq!(wait.tick(&mut bb), Status::Running);
        clock.set(2.0);
        assert_eq!(wait.tick(&mut bb), Status::Success);
    }

    #[test]
    fn wait_reset_rearms_timer() {
        let clock = ManualClock::new();
        let mut bb = Blackboard::with_clock(clock.clone());
        let wait = Wait::new(1.0);

        assert_eq!(wait.tick(&mut bb), Status::Running);
        clock.set(0.9);
        wait.reset(&mut bb);
        assert!(bb.is_empty());

        assert_eq!(wait.tick(&mut bb), Status::Running);
        clock.set(1.5);
        assert_eq!(wait.tick(&mut bb), Status::Running);
        clock.set(2.0);
        assert_eq!(wait.tick(&mut bb), Status::Success);
    }
}
