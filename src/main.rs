/*
 * Swarm Simulation
 *
 * Fish schools and mosquito swarms driven by local steering rules:
 * separation, alignment, cohesion, tail-beat swimming, obstacle avoidance,
 * light attraction and orbiting, plus pointer-driven wind.
 *
 * Set RUST_LOG (for example RUST_LOG=swarm=debug) to see simulation events.
 */

use swarm::app::{model, update};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn main() {
    init_tracing();
    nannou::app(model).update(update).run();
}
