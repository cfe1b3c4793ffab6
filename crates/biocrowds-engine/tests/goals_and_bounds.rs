//! Integration test: position integration, goal refresh and clamping.

use biocrowds_core::{Agent, AgentId, Crowd, TickId, Vec3};
use biocrowds_engine::{CrowdConfig, CrowdEngine, SimContext, TickInputs, TickOutcome};
use biocrowds_steering::MarkerAssignment;
use biocrowds_test_utils::{lane_crowd, markers_toward_goals, TestCrowdBuilder};

fn cycling_config(seed: u64) -> CrowdConfig {
    CrowdConfig {
        waypoint_cycling: true,
        seed,
        ..CrowdConfig::default()
    }
}

#[test]
fn reached_sub_goal_is_redrawn_from_waypoints() {
    for seed in 0..8 {
        let config = cycling_config(seed);
        let waypoints = config.waypoints.clone();
        let mut b = TestCrowdBuilder::new();
        for i in 0..6 {
            let p = Vec3::new(60.0 + i as f32 * 4.0, 0.0, 30.0);
            // Sub-goal 0.5 away, inside the reached distance.
            b = b.agent(p, p + Vec3::new(0.5, 0.0, 0.0));
        }
        let mut engine = CrowdEngine::new(config, b.build()).unwrap();
        let markers = MarkerAssignment::new();

        let TickOutcome::Advanced { metrics, .. } = engine
            .execute_tick(&SimContext::new(), &TickInputs::new(&markers))
            .unwrap()
        else {
            panic!("tick should advance");
        };
        assert_eq!(metrics.goals_reassigned, 6);
        for agent in engine.crowd() {
            assert!(
                waypoints.contains(&agent.goal.sub_goal),
                "seed {seed}: {} not a waypoint",
                agent.goal.sub_goal
            );
        }
    }
}

#[test]
fn goals_stay_put_without_cycling() {
    let p = Vec3::new(30.0, 0.0, 30.0);
    let crowd = TestCrowdBuilder::new().agent(p, p).build();
    let mut engine = CrowdEngine::new(CrowdConfig::default(), crowd).unwrap();
    let markers = MarkerAssignment::new();
    engine
        .execute_tick(&SimContext::new(), &TickInputs::new(&markers))
        .unwrap();
    assert_eq!(engine.crowd().get(AgentId(0)).unwrap().goal.sub_goal, p);
}

#[test]
fn step_past_the_edge_lands_on_it() {
    let start = Vec3::new(99.5, 0.0, 49.5);
    let crowd = Crowd::from_agents([
        Agent::new(AgentId(0), start).with_goal(Vec3::new(120.0, 0.0, 70.0)),
    ])
    .unwrap();
    let mut engine = CrowdEngine::new(CrowdConfig::default(), crowd).unwrap();
    let mut markers = MarkerAssignment::new();
    markers.push(AgentId(0), Vec3::new(101.0, 0.0, 51.0));

    engine
        .execute_tick(&SimContext::new(), &TickInputs::new(&markers))
        .unwrap();
    let a = engine.crowd().get(AgentId(0)).unwrap();
    assert_eq!(a.position.x, 100.0);
    assert_eq!(a.position.z, 50.0);
}

#[test]
fn locked_ticks_are_observable_no_ops() {
    let crowd = lane_crowd(4, 2.0, 10.0, 80.0);
    let mut engine = CrowdEngine::new(cycling_config(3), crowd).unwrap();
    let markers = markers_toward_goals(engine.crowd(), 5, 1.2);
    let before = engine.frame();

    let mut ctx = SimContext::new();
    ctx.set_locked(true);
    for _ in 0..3 {
        let out = engine.execute_tick(&ctx, &TickInputs::new(&markers)).unwrap();
        assert_eq!(out, TickOutcome::Locked);
    }
    assert_eq!(engine.current_tick(), TickId(0));
    assert_eq!(engine.frame(), before);

    ctx.set_locked(false);
    engine.execute_tick(&ctx, &TickInputs::new(&markers)).unwrap();
    assert_eq!(engine.current_tick(), TickId(1));
    assert_ne!(engine.frame().agents, before.agents);
}

#[test]
fn same_seed_same_trajectory() {
    let run = || {
        let mut config = cycling_config(42);
        config.goal_reached_distance = 3.0;
        let mut engine = CrowdEngine::new(config, lane_crowd(8, 1.5, 25.0, 30.0)).unwrap();
        for _ in 0..20 {
            let markers = markers_toward_goals(engine.crowd(), 6, 1.5);
            engine
                .execute_tick(&SimContext::new(), &TickInputs::new(&markers))
                .unwrap();
        }
        engine.frame()
    };
    assert_eq!(run(), run());
}

#[test]
fn steps_never_exceed_max_speed() {
    let crowd = TestCrowdBuilder::new()
        .max_speed(0.7)
        .agent(Vec3::new(10.0, 0.0, 10.0), Vec3::new(40.0, 0.0, 10.0))
        .agent(Vec3::new(10.0, 0.0, 20.0), Vec3::new(10.0, 0.0, 45.0))
        .build();
    let mut engine = CrowdEngine::new(CrowdConfig::default(), crowd).unwrap();
    for _ in 0..10 {
        let markers = markers_toward_goals(engine.crowd(), 8, 2.0);
        engine
            .execute_tick(&SimContext::new(), &TickInputs::new(&markers))
            .unwrap();
        for a in engine.crowd() {
            assert!(a.step.length() <= a.max_speed + 1e-4);
        }
    }
}
