//! Fixed-step simulation of guards sharing one behavior tree.
mod config;
mod guard;

use anyhow::Result;
use blackboard_bt::{BehaviorTreeRunner, Blackboard, ManualClock, Status};
use config::DemoConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DemoConfig::from_env();
    tracing::info!(?config, "starting patrol simulation");

    let tree = guard::guard_tree(config.attack_cooldown)?;
    let clock = ManualClock::new();

    let mut guards: Vec<BehaviorTreeRunner> = (0..config.agents)
        .map(|i| {
            let mut bb = Blackboard::with_clock(clock.clone());
            guard::POSITION.set(&mut bb, i as f64 * 3.0);
            let mut runner = BehaviorTreeRunner::new(tree.clone(), bb);
            runner.start();
            runner
        })
        .collect();

    // The intruder walks across the patrol route and back.
    let mut intruder = -6.0;
    let mut heading = 0.5;

    for step in 0..config.ticks {
        clock.advance(config.tick_seconds);
        intruder += heading;
        if !(-6.0..=16.0).contains(&intruder) {
            heading = -heading;
        }

        for (id, runner) in guards.iter_mut().enumerate() {
            guard::sense(runner.blackboard_mut(), intruder);
            let _span = tracing::info_span!("guard", id, step).entered();
            let status = runner.tick();
            if status != Status::Running {
                tracing::debug!(?status, "behavior cycle finished");
            }
        }
    }

    for (id, runner) in guards.iter_mut().enumerate() {
        runner.stop();
        let snapshot = serde_json::to_string(runner.blackboard())?;
        tracing::info!(id, %snapshot, "final blackboard");
    }

    Ok(())
}
