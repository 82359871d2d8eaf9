//! Guard behavior and the toy world it lives in.
//!
//! Guards walk between two waypoints on a line. When the intruder comes
//! within sight they chase it, and once in reach they attack, at most once
//! per cooldown window.

use blackboard_bt::{
    BehaviorTree, BehaviorTreeBuilder, Blackboard, BlackboardKey, BuildError, Status,
};

pub const POSITION: BlackboardKey<f64> = BlackboardKey::new("position");
pub const TARGET: BlackboardKey<f64> = BlackboardKey::new("target_position");
pub const HAS_TARGET: BlackboardKey<bool> = BlackboardKey::new("has_target");
pub const WAYPOINT: BlackboardKey<i64> = BlackboardKey::new("waypoint");
pub const HITS: BlackboardKey<i64> = BlackboardKey::new("hits");

pub const WAYPOINTS: [f64; 2] = [0.0, 10.0];
pub const SIGHT_RANGE: f64 = 4.0;
pub const ATTACK_RANGE: f64 = 1.0;
pub const SPEED: f64 = 1.0;
pub const PATROL_PAUSE: f64 = 1.0;

/// Builds the guard tree shared by every guard.
pub fn guard_tree(attack_cooldown: f64) -> Result<BehaviorTree, BuildError> {
    BehaviorTreeBuilder::new()
        .selector()
            .sequence()
                .when(HAS_TARGET.name())
                .condition(|bb| distance_to_target(bb).is_some_and(|d| d <= ATTACK_RANGE))
                .action(attack)
                .cooldown(attack_cooldown)
            .end()
            .sequence()
                .when(HAS_TARGET.name())
                .action(chase)
            .end()
            .sequence()
                .action(walk_to_waypoint)
                .log_value(POSITION.name())
                .wait(PATROL_PAUSE)
            .end()
        .end()
        .build()
}

fn distance_to_target(bb: &Blackboard) -> Option<f64> {
    Some((TARGET.get(bb)? - POSITION.get(bb)?).abs())
}

fn attack(bb: &mut Blackboard) -> Status {
    let hits = HITS.get_or_default(bb) + 1;
    HITS.set(bb, hits);
    tracing::info!(hits, "guard attacks");
    Status::Success
}

fn chase(bb: &mut Blackboard) -> Status {
    let Some(target) = TARGET.get(bb) else {
        return Status::Failure;
    };
    if step_towards(bb, target) <= ATTACK_RANGE {
        Status::Success
    } else {
        Status::Running
    }
}

fn walk_to_waypoint(bb: &mut Blackboard) -> Status {
    let index = WAYPOINT.get_or_default(bb).rem_euclid(WAYPOINTS.len() as i64);
    let waypoint = WAYPOINTS[index as usize];
    if step_towards(bb, waypoint) > 0.0 {
        return Status::Running;
    }
    WAYPOINT.set(bb, (index + 1) % WAYPOINTS.len() as i64);
    Status::Success
}

/// Moves one step towards `goal` and returns the remaining distance.
fn step_towards(bb: &mut Blackboard, goal: f64) -> f64 {
    let position = POSITION.get_or_default(bb);
    let delta = goal - position;
    let step = delta.clamp(-SPEED, SPEED);
    POSITION.set(bb, position + step);
    (delta - step).abs()
}

/// Refreshes what a guard can see before it is ticked.
pub fn sense(bb: &mut Blackboard, intruder: f64) {
    let position = POSITION.get_or_default(bb);
    let visible = (intruder - position).abs() <= SIGHT_RANGE;
    HAS_TARGET.set(bb, visible);
    if visible {
        TARGET.set(bb, intruder);
    } else {
        TARGET.remove(bb);
    }
}

#[cfg(test)]
mod tests {
    use blackboard_bt::{BehaviorTreeRunner, ManualClock};

    use super::*;

    fn runner(clock: &ManualClock, position: f64) -> BehaviorTreeRunner {
        let tree = guard_tree(1.5).unwrap();
        let mut bb = Blackboard::with_clock(clock.clone());
        POSITION.set(&mut bb, position);
        let mut runner = BehaviorTreeRunner::new(tree, bb);
        runner.start();
        runner
    }

    #[test]
    fn patrols_towards_first_waypoint() {
        let clock = ManualClock::new();
        let mut guard = runner(&clock, 3.0);

        sense(guard.blackboard_mut(), 100.0);
        assert_eq!(guard.tick(), Status::Running);
        assert_eq!(POSITION.get(guard.blackboard()), Some(2.0));
    }

    #[test]
    fn chases_then_attacks_visible_intruder() {
        let clock = ManualClock::new();
        let mut guard = runner(&clock, 0.0);

        sense(guard.blackboard_mut(), 3.0);
        assert_eq!(guard.tick(), Status::Running);
        assert_eq!(POSITION.get(guard.blackboard()), Some(1.0));

        sense(guard.blackboard_mut(), 3.0);
        assert_eq!(guard.tick(), Status::Success);
        assert_eq!(POSITION.get(guard.blackboard()), Some(2.0));

        sense(guard.blackboard_mut(), 3.0);
        assert_eq!(guard.tick(), Status::Success);
        assert_eq!(HITS.get(guard.blackboard()), Some(1));

        // Cooling down: the guard closes in instead of attacking again.
        clock.advance(0.5);
        sense(guard.blackboard_mut(), 3.0);
        assert_eq!(guard.tick(), Status::Success);
        assert_eq!(HITS.get(guard.blackboard()), Some(1));
    }

    #[test]
    fn sense_clears_lost_target() {
        let mut bb = Blackboard::new();
        POSITION.set(&mut bb, 0.0);

        sense(&mut bb, 2.0);
        assert_eq!(HAS_TARGET.get(&bb), Some(true));
        sense(&mut bb, 20.0);
        assert_eq!(HAS_TARGET.get(&bb), Some(false));
        assert!(!TARGET.has(&bb));
    }
}
