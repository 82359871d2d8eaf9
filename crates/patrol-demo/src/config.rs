//! Demo configuration read from the environment.
use std::env;

/// Simulation settings.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    /// Number of fixed time-steps to simulate.
    pub ticks: u32,
    /// Seconds of simulated time per step.
    pub tick_seconds: f64,
    /// Number of guards sharing the same tree.
    pub agents: usize,
    /// Minimum seconds between two attacks of one guard.
    pub attack_cooldown: f64,
}

impl DemoConfig {
    pub const DEFAULT_TICKS: u32 = 40;
    pub const DEFAULT_TICK_SECONDS: f64 = 0.25;
    pub const DEFAULT_AGENTS: usize = 2;
    pub const DEFAULT_ATTACK_COOLDOWN: f64 = 1.5;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PATROL_TICKS` - Steps to simulate (default: 40)
    /// - `PATROL_TICK_SECONDS` - Seconds per step (default: 0.25, min 0.01)
    /// - `PATROL_AGENTS` - Guards to simulate (default: 2, min 1)
    /// - `PATROL_ATTACK_COOLDOWN` - Seconds between attacks (default: 1.5, min 0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("PATROL_TICKS") {
            config.ticks = ticks;
        }
        if let Some(seconds) = read_env::<f64>("PATROL_TICK_SECONDS") {
            config.tick_seconds = seconds.max(0.01);
        }
        if let Some(agents) = read_env::<usize>("PATROL_AGENTS") {
            config.agents = agents.max(1);
        }
        if let Some(cooldown) = read_env::<f64>("PATROL_ATTACK_COOLDOWN") {
            config.attack_cooldown = cooldown.max(0.0);
        }

        config
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: Self::DEFAULT_TICKS,
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
            agents: Self::DEFAULT_AGENTS,
            attack_cooldown: Self::DEFAULT_ATTACK_COOLDOWN,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
