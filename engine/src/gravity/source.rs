//! Gravity source dispatch
//!
//! A [`GravitySource`] is a pose plus one of the emitter shapes. Evaluation
//! goes through a single `match`, so adding a shape is a compile error at
//! every place that has to handle it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cuboid::BoxSource;
use super::plane::PlaneSource;
use super::sphere::SphereSource;
use crate::physics::Pose;

/// Emitter geometry, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SourceShape {
    Plane(PlaneSource),
    Sphere(SphereSource),
    Box(BoxSource),
}

/// A placed gravity emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravitySource {
    /// Where the emitter sits; planes and boxes also use its orientation
    #[serde(default)]
    pub pose: Pose,
    /// Emitter geometry
    pub shape: SourceShape,
}

impl GravitySource {
    /// Planar source at `pose`.
    pub fn plane(pose: Pose, plane: PlaneSource) -> Self {
        Self {
            pose,
            shape: SourceShape::Plane(plane.sanitized()),
        }
    }

    /// Spherical source centered at `center`.
    pub fn sphere(center: Vec3, sphere: SphereSource) -> Self {
        Self {
            pose: Pose::from_position(center),
            shape: SourceShape::Sphere(sphere.sanitized()),
        }
    }

    /// Box source at `pose`.
    pub fn cuboid(pose: Pose, cuboid: BoxSource) -> Self {
        Self {
            pose,
            shape: SourceShape::Box(cuboid.sanitized()),
        }
    }

    /// Copy with the shape's ordering invariants restored.
    ///
    /// Constructors already do this; deserialized sources need it explicitly
    /// (the field registry applies it on registration).
    pub fn sanitized(self) -> Self {
        let shape = match self.shape {
            SourceShape::Plane(plane) => SourceShape::Plane(plane.sanitized()),
            SourceShape::Sphere(sphere) => SourceShape::Sphere(sphere.sanitized()),
            SourceShape::Box(cuboid) => SourceShape::Box(cuboid.sanitized()),
        };
        Self { pose: self.pose, shape }
    }

    /// Short name of the shape, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self.shape {
            SourceShape::Plane(_) => "plane",
            SourceShape::Sphere(_) => "sphere",
            SourceShape::Box(_) => "box",
        }
    }

    /// Gravity contributed at world-space `point`.
    pub fn gravity_at(&self, point: Vec3) -> Vec3 {
        match &self.shape {
            SourceShape::Plane(plane) => plane.gravity_at(&self.pose, point),
            SourceShape::Sphere(sphere) => sphere.gravity_at(&self.pose, point),
            SourceShape::Box(cuboid) => cuboid.gravity_at(&self.pose, point),
        }
    }
}

static_assertions::assert_impl_all!(GravitySource: Copy, Send, Sync);
