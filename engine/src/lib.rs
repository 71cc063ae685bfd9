//! Planet Walk Engine Library
//!
//! Custom gravity and a physics-driven locomotion controller for worlds
//! where "down" changes from place to place: planets, cubes, floating
//! platforms and anything composed from them.
//!
//! # Modules
//!
//! - [`gravity`] - Gravity sources (plane, sphere, box) and the field that sums them
//! - [`player`] - Locomotion controller: walking, jumping, climbing, platforms
//! - [`physics`] - Collision-engine boundary plus a headless reference world
//! - [`input`] - Frame-latched movement input
//! - [`error`] - Configuration and registry errors
//!
//! # Example
//!
//! ```ignore
//! use planetwalk_engine::gravity::{GravityField, GravitySource, SphereSource};
//! use planetwalk_engine::physics::{SphereBody, StaticWorld, Vec3};
//! use planetwalk_engine::player::LocomotionController;
//!
//! let mut field = GravityField::new();
//! field.register(GravitySource::sphere(Vec3::ZERO, SphereSource::new(9.81, 60.0, 80.0)));
//!
//! let world = StaticWorld::new();
//! let mut body = SphereBody::new(Vec3::new(0.0, 50.5, 0.0), 0.5, 1.0);
//! let mut controller = LocomotionController::default();
//!
//! // Fixed step
//! let contacts = body.resolve_contacts(&world);
//! controller.evaluate_collision(&contacts);
//! controller.step(1.0 / 50.0, &field, &world, &mut body);
//! body.integrate(1.0 / 50.0);
//! ```

pub mod error;
pub mod gravity;
pub mod input;
pub mod physics;
pub mod player;

pub use error::{ConfigError, GravityFieldError};
pub use gravity::{GravityField, GravitySource, SourceId};
pub use input::{MovementInput, MovementKeys};
pub use player::{LocomotionConfig, LocomotionController, LocomotionState};
