//! Physics type re-exports from glam
//!
//! Core mathematical types plus [`Pose`], the position + orientation pair
//! shared by gravity sources and platform bodies.

pub use glam::{Quat, Vec2, Vec3};

use serde::{Deserialize, Serialize};

/// Rigid placement in world space (no scale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space origin
    pub position: Vec3,
    /// World-space orientation
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a pose from position and rotation.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create an unrotated pose at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local point to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// World point to local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// Local direction to world space.
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// World direction to local space.
    pub fn inverse_transform_direction(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }
}
