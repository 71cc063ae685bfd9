//! Locomotion Tests - Controller Scenarios Against the Headless World
//!
//! Every test runs the full fixed-step loop a host would run: resolve
//! contacts, feed them to the controller, step the controller, integrate the
//! body. Worlds are built from box and sphere colliders; gravity comes from
//! registered field sources.

use glam::{Vec2, Vec3};
use planetwalk_engine::gravity::{BoxSource, GravityField, GravitySource, PlaneSource, SphereSource};
use planetwalk_engine::input::{MovementInput, MovementKeys};
use planetwalk_engine::physics::{BodyState, Pose, SphereBody, StaticWorld, SurfaceTags};
use planetwalk_engine::player::{GroundSupport, LocomotionConfig, LocomotionController, LocomotionState};

const DT: f32 = 0.02;
const G: f32 = 9.81;

/// Host loop around one agent.
struct Sim {
    field: GravityField,
    world: StaticWorld,
    body: SphereBody,
    controller: LocomotionController,
}

impl Sim {
    fn new(field: GravityField, world: StaticWorld, position: Vec3) -> Self {
        Self::with_config(field, world, position, LocomotionConfig::default())
    }

    fn with_config(field: GravityField, world: StaticWorld, position: Vec3, config: LocomotionConfig) -> Self {
        let mut controller = LocomotionController::new(config).expect("valid config");
        controller.orient(&field, position);
        Self {
            field,
            world,
            body: SphereBody::new(position, 0.5, 1.0),
            controller,
        }
    }

    fn step(&mut self) -> LocomotionState {
        let contacts = self.body.resolve_contacts(&self.world);
        self.controller.evaluate_collision(&contacts);
        let state = self.controller.step(DT, &self.field, &self.world, &mut self.body);
        self.body.integrate(DT);
        state
    }

    fn run(&mut self, steps: usize) -> Vec<LocomotionState> {
        (0..steps).map(|_| self.step()).collect()
    }
}

/// Uniform -Y gravity everywhere below y = 1000.
fn flat_gravity() -> GravityField {
    let mut field = GravityField::new();
    field.register(GravitySource::plane(
        Pose::from_position(Vec3::new(0.0, 1000.0, 0.0)),
        PlaneSource::new(G, 0.0),
    ));
    field
}

fn floor_world() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_box(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 20.0));
    world
}

// ============================================================================
// Flat ground
// ============================================================================

#[test]
fn test_settles_on_floor() {
    let mut sim = Sim::new(flat_gravity(), floor_world(), Vec3::new(0.0, 0.5, 0.0));
    let states = sim.run(20);

    assert_eq!(*states.last().expect("ran"), LocomotionState::Grounded(GroundSupport::Contact));
    assert!((sim.body.position.y - 0.5).abs() < 0.02, "y {}", sim.body.position.y);
    assert!(sim.controller.is_grounded());
    assert!((sim.controller.contact_normal() - Vec3::Y).length() < 1e-5);
}

#[test]
fn test_walk_reaches_max_speed() {
    let mut sim = Sim::new(flat_gravity(), floor_world(), Vec3::new(0.0, 0.5, -10.0));
    sim.run(5);

    let mut input = MovementInput::new();
    let keys = MovementKeys {
        forward: true,
        ..MovementKeys::new()
    };
    for _ in 0..100 {
        input.apply_keys(&keys);
        sim.controller.set_move_input(input.axes());
        let state = sim.step();
        assert!(state.is_grounded(), "lost ground while walking: {:?}", state);
    }

    let v = sim.controller.velocity();
    assert!((v.z - 10.0).abs() < 0.05, "vz {}", v.z);
    assert!(v.x.abs() < 1e-4);
    assert!(sim.body.position.z > -5.0);
}

#[test]
fn test_jump_arc_height() {
    let mut sim = Sim::new(flat_gravity(), floor_world(), Vec3::new(0.0, 0.5, 0.0));
    sim.run(10);

    sim.controller.request_jump();
    let mut apex = sim.body.position.y;
    let mut landed = false;
    for step in 0..200 {
        let state = sim.step();
        apex = apex.max(sim.body.position.y);
        if step > 5 && state == LocomotionState::Grounded(GroundSupport::Contact) {
            landed = true;
            break;
        }
    }

    assert!(landed, "never landed");
    let height = apex - 0.5;
    assert!((height - 2.0).abs() < 0.15, "jump height {}", height);
    assert_eq!(sim.controller.jump_phase(), 0);
}

#[test]
fn test_jump_latched_between_steps() {
    let mut sim = Sim::new(flat_gravity(), floor_world(), Vec3::new(0.0, 0.5, 0.0));
    sim.run(10);

    // Pressed during a visual frame, released before the step runs
    let mut input = MovementInput::new();
    input.apply_keys(&MovementKeys {
        jump: true,
        ..MovementKeys::new()
    });
    input.apply_keys(&MovementKeys::new());

    if input.take_jump() {
        sim.controller.request_jump();
    }
    sim.step();
    assert!(sim.controller.velocity().y > 5.0);
}

// ============================================================================
// Snapping
// ============================================================================

fn step_down_world(drop: f32) -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_box(Vec3::new(-10.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
    world.add_box(Vec3::new(5.0, -1.0 - drop, -5.0), Vec3::new(20.0, -drop, 5.0));
    world
}

fn run_over_step(config: LocomotionConfig) -> (Vec<LocomotionState>, f32) {
    let mut sim = Sim::with_config(flat_gravity(), step_down_world(0.3), Vec3::new(2.0, 0.5, 0.0), config);
    sim.run(10);

    sim.controller.set_desired_velocity(Vec3::new(5.0, 0.0, 0.0));
    sim.body.velocity = Vec3::new(5.0, 0.0, 0.0);
    let states = sim.run(60);
    (states, sim.body.position.y)
}

#[test]
fn test_snap_keeps_contact_down_a_step() {
    let (states, y) = run_over_step(LocomotionConfig::default());

    assert!(states.contains(&LocomotionState::Grounded(GroundSupport::Snap)));
    assert!(
        !states.contains(&LocomotionState::Airborne),
        "went airborne: {:?}",
        states
    );
    assert!((y - 0.2).abs() < 0.05, "ended at y {}", y);
}

#[test]
fn test_without_probe_the_step_is_a_fall() {
    let config = LocomotionConfig {
        probe_distance: 0.0,
        ..LocomotionConfig::default()
    };
    let (states, _) = run_over_step(config);

    assert!(!states.contains(&LocomotionState::Grounded(GroundSupport::Snap)));
    assert!(states.contains(&LocomotionState::Airborne));
}

// ============================================================================
// Climbing
// ============================================================================

#[test]
fn test_climbs_tagged_wall() {
    let mut world = floor_world();
    world.add_tagged_box(
        Vec3::new(2.0, -1.0, -5.0),
        Vec3::new(3.0, 10.0, 5.0),
        SurfaceTags::CLIMBABLE,
        0,
    );
    let mut sim = Sim::new(flat_gravity(), world, Vec3::new(0.0, 0.5, 0.0));
    sim.run(5);

    sim.controller.set_move_input(Vec2::new(1.0, 1.0));
    let states = sim.run(150);

    assert!(states.contains(&LocomotionState::Climbing));
    assert!(sim.body.position.y > 2.0, "only reached y {}", sim.body.position.y);
    assert!(sim.body.position.x < 1.6);
}

#[test]
fn test_plain_wall_is_not_climbed() {
    let mut world = floor_world();
    world.add_box(Vec3::new(2.0, -1.0, -5.0), Vec3::new(3.0, 10.0, 5.0));
    let mut sim = Sim::new(flat_gravity(), world, Vec3::new(0.0, 0.5, 0.0));
    sim.run(5);

    sim.controller.set_move_input(Vec2::new(1.0, 1.0));
    let states = sim.run(150);

    assert!(!states.contains(&LocomotionState::Climbing));
    assert!(sim.body.position.y < 0.6);
}

// ============================================================================
// Platforms
// ============================================================================

#[test]
fn test_rides_moving_platform() {
    let mut world = StaticWorld::new();
    let platform = world.add_body(BodyState::kinematic(Vec3::ZERO));
    world.attach_box(platform, Vec3::new(-2.0, -0.5, -2.0), Vec3::new(2.0, 0.0, 2.0), SurfaceTags::NONE);
    let mut sim = Sim::new(flat_gravity(), world, Vec3::new(0.0, 0.5, 0.0));
    sim.run(10);

    let speed = 2.5;
    let mut platform_x = 0.0;
    for _ in 0..100 {
        platform_x += speed * DT;
        sim.world
            .set_body_pose(platform, Pose::from_position(Vec3::new(platform_x, 0.0, 0.0)));
        sim.step();
    }

    assert_eq!(sim.controller.connected_body(), Some(platform));
    assert!((sim.body.velocity.x - speed).abs() < 0.05, "vx {}", sim.body.velocity.x);
    assert!((sim.body.position.x - platform_x).abs() < 0.5);
}

#[test]
fn test_leaves_platform_that_vanishes() {
    let mut world = StaticWorld::new();
    world.add_box(Vec3::new(-20.0, -2.0, -20.0), Vec3::new(20.0, -1.0, 20.0));
    let platform = world.add_body(BodyState::kinematic(Vec3::ZERO));
    world.attach_box(platform, Vec3::new(-2.0, -0.5, -2.0), Vec3::new(2.0, 0.0, 2.0), SurfaceTags::NONE);
    let mut sim = Sim::new(flat_gravity(), world, Vec3::new(0.0, 0.5, 0.0));
    sim.run(10);
    assert_eq!(sim.controller.connected_body(), Some(platform));

    sim.world.remove_body(platform);
    sim.run(100);
    assert_eq!(sim.controller.connected_body(), None);
    assert!((sim.body.position.y + 0.5).abs() < 0.05, "y {}", sim.body.position.y);
}

// ============================================================================
// Non-uniform gravity
// ============================================================================

#[test]
fn test_walks_on_sphere_planet() {
    let mut field = GravityField::new();
    field.register(GravitySource::sphere(Vec3::ZERO, SphereSource::new(G, 20.0, 30.0)));
    let mut world = StaticWorld::new();
    world.add_sphere(Vec3::ZERO, 10.0, SurfaceTags::NONE, 0);
    let config = LocomotionConfig {
        max_speed: 4.0,
        ..LocomotionConfig::default()
    };
    let start = Vec3::new(0.0, 10.5, 0.0);
    let mut sim = Sim::with_config(field, world, start, config);
    sim.run(10);

    sim.controller.set_move_input(Vec2::new(0.0, 1.0));
    let mut grounded = 0;
    for _ in 0..300 {
        if sim.step().is_grounded() {
            grounded += 1;
        }
        let altitude = sim.body.position.length();
        assert!((altitude - 10.5).abs() < 0.1, "altitude {}", altitude);
    }

    assert!(grounded > 290, "grounded {} of 300 steps", grounded);
    let travelled = start.normalize().angle_between(sim.body.position.normalize());
    assert!(travelled > 0.5, "travelled {} rad", travelled);
    let radial = sim.body.position.normalize();
    assert!((sim.controller.up_axis() - radial).length() < 0.05);
}

#[test]
fn test_spawns_grounded_on_planet_underside() {
    let planet = || {
        let mut field = GravityField::new();
        field.register(GravitySource::sphere(Vec3::ZERO, SphereSource::new(G, 20.0, 30.0)));
        let mut world = StaticWorld::new();
        world.add_sphere(Vec3::ZERO, 10.0, SurfaceTags::NONE, 0);
        (field, world)
    };
    // Resting slightly inside the surface so the first resolve reports contact
    let start = Vec3::new(0.0, -10.45, 0.0);

    let (field, world) = planet();
    let mut sim = Sim::new(field, world, start);
    assert!((sim.controller.up_axis() + Vec3::Y).length() < 1e-5);
    assert_eq!(sim.step(), LocomotionState::Grounded(GroundSupport::Contact));

    // Without orienting, the first contacts are judged against +Y and read as a ceiling
    let (field, world) = planet();
    let mut sim = Sim::new(field, world, start);
    sim.controller = LocomotionController::default();
    assert_eq!(sim.step(), LocomotionState::Airborne);
    assert_eq!(sim.step(), LocomotionState::Grounded(GroundSupport::Contact));
}

#[test]
fn test_walks_over_cube_edge() {
    let mut field = GravityField::new();
    field.register(GravitySource::cuboid(
        Pose::IDENTITY,
        BoxSource::new(G, Vec3::splat(5.0), 1.0, 2.0).with_outer(1.0, 3.0),
    ));
    let mut world = StaticWorld::new();
    world.add_box(Vec3::splat(-5.0), Vec3::splat(5.0));
    let config = LocomotionConfig {
        max_speed: 1.0,
        ..LocomotionConfig::default()
    };
    let mut sim = Sim::with_config(field, world, Vec3::new(0.0, 5.5, 4.0), config);
    sim.run(10);
    assert!((sim.controller.up_axis() - Vec3::Y).length() < 1e-5);

    sim.controller.set_move_input(Vec2::new(0.0, 1.0));
    sim.run(400);

    // Now on the +Z face, walking "down" it
    assert!(sim.body.position.z > 5.2, "z {}", sim.body.position.z);
    assert!(sim.body.position.y < 4.5, "y {}", sim.body.position.y);
    assert!((sim.controller.up_axis() - Vec3::Z).length() < 0.05);
}
