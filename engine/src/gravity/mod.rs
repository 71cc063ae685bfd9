//! Gravity Module
//!
//! Composable gravity: "down" at a point is whatever the registered sources
//! add up to there.
//!
//! # Components
//!
//! - [`GravityField`] - Registry of sources; evaluates net gravity and up axis
//! - [`GravitySource`] - A placed emitter: plane, sphere shell, or box
//! - [`PlaneSource`], [`SphereSource`], [`BoxSource`] - Emitter geometry with falloff
//! - [`GravityFollower`] - Applies field gravity to passive bodies

pub mod cuboid;
pub mod field;
pub mod follower;
pub mod plane;
pub mod source;
pub mod sphere;

pub use cuboid::BoxSource;
pub use field::{GravityField, SourceId};
pub use follower::{FLOAT_TO_SLEEP_DELAY, GravityFollower};
pub use plane::PlaneSource;
pub use source::{GravitySource, SourceShape};
pub use sphere::SphereSource;
