use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use blackboard_bt::builder::{action, parallel};
use blackboard_bt::{
    BehaviorTree, BehaviorTreeBuilder, Blackboard, BlackboardKey, ManualClock, Status,
};

const HAS_TARGET: BlackboardKey<bool> = BlackboardKey::new("has_target");
const DISTANCE: BlackboardKey<f64> = BlackboardKey::new("distance");
const AMMO: BlackboardKey<i64> = BlackboardKey::new("ammo");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Guard: attack when close (rate limited), otherwise chase, otherwise
/// patrol with a pause between legs.
fn guard_builder(clock: &ManualClock) -> BehaviorTreeBuilder {
    BehaviorTreeBuilder::with_blackboard(Blackboard::with_clock(clock.clone()))
        .selector()
            .sequence()
                .when("has_target")
                .when_less_than("distance", 2.0)
                .action(|bb| {
                    let ammo = AMMO.get_or_default(bb);
                    if ammo == 0 {
                        return Status::Failure;
                    }
                    AMMO.set(bb, ammo - 1);
                    Status::Success
                })
                .cooldown(1.0)
            .end()
            .sequence()
                .when("has_target")
                .action(|bb| {
                    let distance = DISTANCE.get_or_default(bb) - 1.0;
                    DISTANCE.set(bb, distance.max(0.0));
                    if distance <= 1.0 { Status::Success } else { Status::Running }
                })
            .end()
            .sequence()
                .increment("patrol_legs", 1.0)
                .wait(0.5)
            .end()
        .end()
}

#[test]
fn guard_patrols_then_chases_then_attacks() {
    init_tracing();
    let clock = ManualClock::new();
    let mut runner = guard_builder(&clock).build_runner().unwrap();
    runner.start();

    // No target: patrol leg starts and waits.
    assert_eq!(runner.tick(), Status::Running);
    clock.set(0.5);
    assert_eq!(runner.tick(), Status::Success);
    assert_eq!(runner.blackboard().get::<f64>("patrol_legs"), Some(1.0));

    // Target spotted far away: chase over several ticks.
    HAS_TARGET.set(runner.blackboard_mut(), true);
    DISTANCE.set(runner.blackboard_mut(), 4.0);
    AMMO.set(runner.blackboard_mut(), 2);
    assert_eq!(runner.tick(), Status::Running);
    assert_eq!(runner.tick(), Status::Running);
    assert_eq!(runner.tick(), Status::Success);
    assert_eq!(DISTANCE.get(runner.blackboard()), Some(1.0));

    // Close enough: attack, then the cooldown pushes the guard back to chasing.
    clock.set(1.0);
    assert_eq!(runner.tick(), Status::Success);
    assert_eq!(AMMO.get(runner.blackboard()), Some(1));

    clock.set(1.5);
    assert_eq!(runner.tick(), Status::Success);
    assert_eq!(AMMO.get(runner.blackboard()), Some(1));

    clock.set(2.0);
    assert_eq!(runner.tick(), Status::Success);
    assert_eq!(AMMO.get(runner.blackboard()), Some(0));
}

#[test]
fn stop_and_restart_resumes_from_scratch() {
    let clock = ManualClock::new();
    let mut runner = guard_builder(&clock).build_runner().unwrap();

    runner.start();
    assert_eq!(runner.tick(), Status::Running);

    runner.stop();
    assert_eq!(runner.tick(), Status::Failure);
    assert!(!runner.is_running());

    // The wait was reset: a new patrol leg begins.
    runner.start();
    clock.set(10.0);
    assert_eq!(runner.tick(), Status::Running);
    assert_eq!(runner.blackboard().get::<f64>("patrol_legs"), Some(2.0));
}

#[test]
fn shared_tree_keeps_agents_independent() {
    let clock = ManualClock::new();
    let tree = guard_builder(&clock).build().unwrap();

    let mut a = Blackboard::with_clock(clock.clone());
    let mut b = Blackboard::with_clock(clock.clone());
    HAS_TARGET.set(&mut b, true);
    DISTANCE.set(&mut b, 10.0);

    assert_eq!(tree.tick(&mut a), Status::Running);
    assert_eq!(tree.tick(&mut b), Status::Running);

    clock.set(0.5);
    assert_eq!(tree.tick(&mut a), Status::Success);
    assert_eq!(tree.tick(&mut b), Status::Running);
    assert_eq!(DISTANCE.get(&b), Some(8.0));
    assert!(!a.has("distance"));
    assert!(!b.has("patrol_legs"));
}

#[test]
fn parallel_waits_for_quorum_across_ticks() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ticks);
    let slow = action(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            Status::Running
        } else {
            Status::Success
        }
    });
    let tree = BehaviorTree::from_boxed(parallel(
        2,
        vec![action(|_| Status::Success), slow, action(|_| Status::Running)],
    ));
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick(&mut bb), Status::Running);
    assert_eq!(tree.tick(&mut bb), Status::Running);
    assert_eq!(tree.tick(&mut bb), Status::Success);
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

#[test]
fn aborting_ancestor_clears_stuck_parallel() {
    let clock = ManualClock::new();
    // The parallel can never reach 3 successes; it only leaves Running when
    // the enclosing sequence is reset.
    let tree = BehaviorTreeBuilder::new()
        .sequence()
            .action(|_| Status::Success)
            .parallel(3)
                .wait(100.0)
                .action(|_| Status::Success)
            .end()
        .end()
        .build()
        .unwrap();
    let mut bb = Blackboard::with_clock(clock.clone());

    for _ in 0..3 {
        clock.advance(1.0);
        assert_eq!(tree.tick(&mut bb), Status::Running);
    }
    assert!(!bb.is_empty());

    tree.reset(&mut bb);
    assert!(bb.is_empty());
}

#[test]
fn faulting_callbacks_fail_their_leaf_only() {
    init_tracing();
    let tree = BehaviorTreeBuilder::new()
        .selector()
            .try_condition(|bb| Ok(bb.try_get::<bool>("never_set")?))
            .action(|_| panic!("animation rig missing"))
            .set_true("fallback_ran")
        .end()
        .build()
        .unwrap();
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick(&mut bb), Status::Success);
    assert_eq!(bb.get::<bool>("fallback_ran"), Some(true));
}

#[cfg(feature = "serde")]
#[test]
fn blackboard_snapshot_serializes_values() {
    let mut bb = Blackboard::new();
    bb.set("alert", true);
    bb.set("ammo", 3_i64);
    bb.set("speed", 1.5);
    bb.set("name", "guard");

    let json = serde_json::to_value(&bb).unwrap();
    assert_eq!(json["alert"], serde_json::json!(true));
    assert_eq!(json["ammo"], serde_json::json!(3));
    assert_eq!(json["name"], serde_json::json!("guard"));

    let restored: Blackboard = serde_json::from_value(json).unwrap();
    assert_eq!(restored.get::<i64>("ammo"), Some(3));
    assert_eq!(restored.get::<f64>("speed"), Some(1.5));
}
