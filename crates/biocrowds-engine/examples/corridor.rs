//! Two groups crossing a corridor, with springs and waypoint cycling.
//!
//! Demonstrates:
//!   1. Loading a `CrowdConfig` from TOML
//!   2. Spawning agents with `CrowdConfig::make_agent`
//!   3. A closest-agent marker assignment, recomputed every tick
//!   4. Stepping the engine, pausing it through `SimContext`
//!   5. Writing frames as JSON lines
//!
//! Run with:
//!   RUST_LOG=biocrowds_engine=debug cargo run --example corridor > frames.jsonl

use std::io;

use biocrowds_core::{AgentId, Crowd, Vec3};
use biocrowds_engine::{CrowdConfig, CrowdEngine, FrameRecorder, SimContext, TickInputs, TickOutcome};
use biocrowds_springs::MassMap;
use biocrowds_steering::MarkerAssignment;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
seed = 7
waypoint_cycling = true
goal_reached_distance = 1.5
waypoints = [[10.0, 0.0, 25.0], [90.0, 0.0, 25.0]]

[world]
x = 100.0
z = 50.0

[springs]
enabled = true

[coupling]
distance = 1.2
max_couplings = 1
"#;

const TICKS: u32 = 200;
const GROUP: u32 = 20;
const MARKER_SPACING: f32 = 0.5;
const PERSONAL_SPACE: f32 = 2.0;

// ─── Marker assignment ──────────────────────────────────────────
//
// Markers sit on a fixed lattice. Each one goes to the closest agent
// within PERSONAL_SPACE, which is how agents compete for room.

fn lattice(config: &CrowdConfig) -> Vec<Vec3> {
    let nx = (config.world.x / MARKER_SPACING) as u32;
    let nz = (config.world.z / MARKER_SPACING) as u32;
    (0..nx)
        .flat_map(|i| {
            (0..nz).map(move |j| {
                Vec3::new(
                    (i as f32 + 0.5) * MARKER_SPACING,
                    0.0,
                    (j as f32 + 0.5) * MARKER_SPACING,
                )
            })
        })
        .collect()
}

fn assign(markers: &[Vec3], crowd: &Crowd) -> MarkerAssignment {
    let mut out = MarkerAssignment::with_capacity(crowd.len());
    for &m in markers {
        let closest = crowd
            .iter()
            .map(|a| (a.position.distance(m), a.id))
            .filter(|(d, _)| *d < PERSONAL_SPACE)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((_, id)) = closest {
            out.push(id, m);
        }
    }
    out
}

fn spawn(config: &CrowdConfig) -> Crowd {
    let mut crowd = Crowd::with_capacity((GROUP * 2) as usize);
    for i in 0..GROUP {
        let z = 20.0 + (i % 5) as f32 * 2.5;
        let x = 5.0 + (i / 5) as f32 * 2.5;
        let left = config
            .make_agent(AgentId(i), Vec3::new(x, 0.0, z))
            .with_goal(Vec3::new(90.0, 0.0, 25.0));
        let right = config
            .make_agent(AgentId(GROUP + i), Vec3::new(100.0 - x, 0.0, z))
            .with_goal(Vec3::new(10.0, 0.0, 25.0));
        for agent in [left, right] {
            if let Err(e) = crowd.spawn(agent) {
                eprintln!("spawn failed: {e}");
            }
        }
    }
    crowd
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = CrowdConfig::from_toml_str(CONFIG)?;
    let markers = lattice(&config);
    let crowd = spawn(&config);
    let masses = MassMap::uniform(&crowd, config.fluid.agent_mass);
    let mut engine = CrowdEngine::new(config, crowd)?;

    let stdout = io::stdout();
    let mut recorder = FrameRecorder::new(stdout.lock());
    let mut ctx = SimContext::new();

    for i in 0..TICKS {
        // Pause for ten ticks halfway through.
        ctx.set_locked((TICKS / 2..TICKS / 2 + 10).contains(&i));

        let assignment = assign(&markers, engine.crowd());
        let inputs = TickInputs::new(&assignment).with_masses(&masses);
        if let TickOutcome::Advanced { tick, metrics } = engine.execute_tick(&ctx, &inputs)? {
            recorder.record(&engine.frame())?;
            if tick.0 % 50 == 0 {
                eprintln!(
                    "tick {tick}: springs={} reassigned={} total={}us",
                    metrics.spring_count, metrics.goals_reassigned, metrics.total_us
                );
            }
        }
    }
    recorder.flush()?;
    eprintln!("{} frames written", recorder.frames());
    Ok(())
}
