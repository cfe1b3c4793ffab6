//! Integration test: fluid blending and frame logging through the engine.

use biocrowds_core::{AgentId, TickId, Vec3};
use biocrowds_engine::{CrowdConfig, CrowdEngine, FrameRecord, FrameRecorder, SimContext, TickInputs};
use biocrowds_space::CellGrid;
use biocrowds_steering::{FluidField, FluidParticle, FluidSample, MarkerAssignment};
use biocrowds_test_utils::{lane_crowd, markers_toward_goals, TestCrowdBuilder};

fn pushing_field(config: &CrowdConfig, at: Vec3) -> FluidField {
    let grid = CellGrid::new(config.cell_width).unwrap();
    let mut field = FluidField::new(grid);
    field.insert(
        grid.key_for(at),
        FluidSample {
            momentum: Vec3::new(65.0, 40.0, 0.0),
            mass: 0.0,
        },
    );
    field
}

#[test]
fn fluid_pushes_agent_when_enabled() {
    let p = Vec3::new(20.0, 0.0, 20.0);
    let mut config = CrowdConfig::default();
    config.fluid.enabled = true;
    let field = pushing_field(&config, p);
    let crowd = TestCrowdBuilder::new().agent(p, p).build();
    let mut engine = CrowdEngine::new(config, crowd).unwrap();
    let markers = MarkerAssignment::new();

    engine
        .execute_tick(&SimContext::new(), &TickInputs::new(&markers).with_fluid(&field))
        .unwrap();
    let a = engine.crowd().get(AgentId(0)).unwrap();
    assert_eq!(a.step, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(a.position, Vec3::new(21.0, 0.0, 20.0));
    assert_eq!(engine.last_metrics().fluid_blended, 1);
}

#[test]
fn fluid_ignored_when_disabled() {
    let p = Vec3::new(20.0, 0.0, 20.0);
    let config = CrowdConfig::default();
    let field = pushing_field(&config, p);
    let crowd = TestCrowdBuilder::new().agent(p, p).build();
    let mut engine = CrowdEngine::new(config, crowd).unwrap();
    let markers = MarkerAssignment::new();

    engine
        .execute_tick(&SimContext::new(), &TickInputs::new(&markers).with_fluid(&field))
        .unwrap();
    assert_eq!(engine.crowd().get(AgentId(0)).unwrap().position, p);
    assert_eq!(engine.last_metrics().fluid_blended, 0);
}

fn step_from_particles(particle_mass: f32, height_threshold: f32) -> Vec3 {
    let p = Vec3::new(20.0, 0.0, 20.0);
    let mut config = CrowdConfig::default();
    config.fluid.enabled = true;
    config.fluid.particle_mass = particle_mass;
    config.fluid.height_threshold = height_threshold;
    let crowd = TestCrowdBuilder::new().agent(p, p).build();
    let mut engine = CrowdEngine::new(config, crowd).unwrap();
    let markers = MarkerAssignment::new();
    let particles = [FluidParticle {
        position: Vec3::new(20.5, 0.5, 20.5),
        velocity: Vec3::X,
    }];

    engine
        .execute_tick(&SimContext::new(), &TickInputs::new(&markers).with_particles(&particles))
        .unwrap();
    engine.crowd().get(AgentId(0)).unwrap().step
}

#[test]
fn particles_are_binned_with_configured_constants() {
    // One particle moving 1 unit per frame at 32 fps: momentum 32 × mass.
    let light = step_from_particles(0.001, 1.7);
    assert!((light.x - 0.032 / 65.001).abs() < 1e-7);
    let heavy = step_from_particles(1.0, 1.7);
    assert!((heavy.x - 32.0 / 66.0).abs() < 1e-6);
    assert_eq!(heavy.y, 0.0);
    assert_eq!(heavy.z, 0.0);
}

#[test]
fn particles_above_threshold_do_not_push() {
    assert_eq!(step_from_particles(1.0, 0.4), Vec3::ZERO);
}

#[test]
fn recorder_logs_every_tick() {
    let mut config = CrowdConfig::default();
    config.springs.enabled = true;
    let crowd = lane_crowd(3, 1.0, 10.0, 60.0);
    let masses = biocrowds_test_utils::uniform_masses(&crowd, 65.0);
    let mut engine = CrowdEngine::new(config, crowd).unwrap();
    let mut recorder = FrameRecorder::new(Vec::new());

    for _ in 0..3 {
        let markers = markers_toward_goals(engine.crowd(), 4, 1.0);
        engine
            .execute_tick(&SimContext::new(), &TickInputs::new(&markers).with_masses(&masses))
            .unwrap();
        recorder.record(&engine.frame()).unwrap();
    }
    recorder.flush().unwrap();
    assert_eq!(recorder.frames(), 3);

    let text = String::from_utf8(recorder.into_inner()).unwrap();
    let frames: Vec<FrameRecord> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let ticks: Vec<TickId> = frames.iter().map(|f| f.tick).collect();
    assert_eq!(ticks, vec![TickId(1), TickId(2), TickId(3)]);
    assert_eq!(frames[2], engine.frame());
    assert!(!frames[0].springs.is_empty());
}
