//! Planet Walk - Headless Locomotion Demo
//!
//! Run with: `cargo run --bin planet_walk [scene.json]`
//!
//! Drives a sphere agent across a scene at a fixed step and logs the
//! controller's classification timeline. Without a scene file the agent
//! walks around a small planet, jumping every two seconds.
//!
//! Verbosity follows `RUST_LOG`, e.g. `RUST_LOG=planetwalk_engine=debug`.
//!
//! Scene format (all fields optional):
//!
//! ```json
//! {
//!   "gravity": [ { "shape": { "kind": "Sphere", "strength": 9.81,
//!                            "outer_radius": 20.0, "outer_falloff_radius": 30.0 } } ],
//!   "spheres": [ { "center": [0, 0, 0], "radius": 10.0 } ],
//!   "boxes": [ { "min": [-1, 10, -1], "max": [1, 12, 1], "tags": 2 } ],
//!   "controller": { "max_speed": 4.0 },
//!   "start": [0.0, 10.5, 0.0],
//!   "input": [0.0, 1.0],
//!   "steps": 500,
//!   "dt": 0.02,
//!   "jump_every": 100
//! }
//! ```

use std::error::Error;
use std::fs;

use glam::{Vec2, Vec3};
use serde::Deserialize;
use tracing::{info, warn};

use planetwalk_engine::gravity::{GravityField, GravitySource, SphereSource};
use planetwalk_engine::input::MovementInput;
use planetwalk_engine::physics::{SphereBody, StaticWorld, SurfaceTags};
use planetwalk_engine::player::{LocomotionConfig, LocomotionController};

/// Agent collision radius (meters)
const AGENT_RADIUS: f32 = 0.5;

/// Agent mass (kg)
const AGENT_MASS: f32 = 1.0;

#[derive(Debug, Clone, Deserialize)]
struct SceneSphere {
    center: Vec3,
    radius: f32,
    #[serde(default)]
    tags: SurfaceTags,
}

#[derive(Debug, Clone, Deserialize)]
struct SceneBox {
    min: Vec3,
    max: Vec3,
    #[serde(default)]
    tags: SurfaceTags,
    #[serde(default)]
    layer: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct SceneConfig {
    gravity: Vec<GravitySource>,
    spheres: Vec<SceneSphere>,
    boxes: Vec<SceneBox>,
    controller: LocomotionConfig,
    start: Vec3,
    input: Vec2,
    steps: usize,
    dt: f32,
    jump_every: Option<usize>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: vec![GravitySource::sphere(Vec3::ZERO, SphereSource::new(9.81, 20.0, 30.0))],
            spheres: vec![SceneSphere {
                center: Vec3::ZERO,
                radius: 10.0,
                tags: SurfaceTags::NONE,
            }],
            boxes: Vec::new(),
            controller: LocomotionConfig {
                max_speed: 4.0,
                ..LocomotionConfig::default()
            },
            start: Vec3::new(0.0, 10.5, 0.0),
            input: Vec2::new(0.0, 1.0),
            steps: 500,
            dt: 0.02,
            jump_every: Some(100),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let scene = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading scene");
            serde_json::from_str::<SceneConfig>(&fs::read_to_string(&path)?)?
        }
        None => SceneConfig::default(),
    };

    run(scene)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn build_world(scene: &SceneConfig) -> StaticWorld {
    let mut world = StaticWorld::new();
    for sphere in &scene.spheres {
        world.add_sphere(sphere.center, sphere.radius, sphere.tags, 0);
    }
    for cuboid in &scene.boxes {
        world.add_tagged_box(cuboid.min, cuboid.max, cuboid.tags, cuboid.layer);
    }
    world
}

fn run(scene: SceneConfig) -> Result<(), Box<dyn Error>> {
    if !(scene.dt > 0.0) {
        return Err(format!("dt must be positive, got {}", scene.dt).into());
    }

    let mut field = GravityField::new();
    for source in &scene.gravity {
        field.register(*source);
    }
    let world = build_world(&scene);
    let mut body = SphereBody::new(scene.start, AGENT_RADIUS, AGENT_MASS);
    let mut controller = LocomotionController::new(scene.controller)?;
    controller.orient(&field, scene.start);
    let mut input = MovementInput::new();
    input.set_axes(scene.input.x, scene.input.y);

    info!(
        sources = field.len(),
        steps = scene.steps,
        dt = scene.dt,
        start = ?scene.start,
        "starting simulation"
    );

    let mut previous = None;
    let mut grounded_steps = 0usize;
    for step in 0..scene.steps {
        if scene.jump_every.is_some_and(|n| n > 0 && step > 0 && step % n == 0) {
            input.request_jump();
        }

        let contacts = body.resolve_contacts(&world);
        controller.evaluate_collision(&contacts);
        controller.set_move_input(input.axes());
        if input.take_jump() {
            controller.request_jump();
        }
        let state = controller.step(scene.dt, &field, &world, &mut body);
        body.integrate(scene.dt);

        if state.is_grounded() {
            grounded_steps += 1;
        }
        if previous != Some(state) {
            info!(
                step,
                time = step as f32 * scene.dt,
                state = ?state,
                position = ?body.position,
                speed = body.velocity.length(),
                "state"
            );
            previous = Some(state);
        }
        if !body.position.is_finite() {
            warn!(step, "agent position diverged, stopping");
            break;
        }
    }

    info!(
        position = ?body.position,
        up = ?controller.up_axis(),
        grounded_fraction = grounded_steps as f32 / scene.steps.max(1) as f32,
        "simulation finished"
    );
    Ok(())
}
