//! Physics module
//!
//! The boundary between the locomotion core and whatever collision engine
//! hosts it, plus a small reference implementation of that boundary.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Mass in kg
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam, plus [`Pose`]
//! - [`query`] - Contacts, raycast hits, body handles and the host traits
//! - [`collision`] - Headless box/planet world and sphere body implementing those traits

pub mod collision;
pub mod query;
pub mod types;

pub use collision::{
    BoxCollider, Penetration, SphereBody, SphereCollider, StaticWorld, aabb_surface_normal, ray_aabb_intersect,
    ray_sphere_intersect,
};
pub use query::{AgentBody, BodyHandle, BodyState, Contact, LayerMask, PhysicsQueries, RaycastHit, SurfaceTags};
pub use types::{Pose, Quat, Vec2, Vec3};
