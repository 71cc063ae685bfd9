//! Box gravity
//!
//! Inside the box only the nearest face pulls, with full strength up to
//! `inner_distance` from it and a linear fade to zero at
//! `inner_falloff_distance`; the result always points toward the interior.
//! Outside the box the query point is pulled toward the nearest surface
//! point, full strength up to `outer_distance` and fading to zero at
//! `outer_falloff_distance`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::Pose;

/// Box emitter geometry in the box's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSource {
    /// Acceleration at full strength (m/s^2)
    pub strength: f32,
    /// Distances from the center straight to the faces
    pub half_extents: Vec3,
    /// Interior distance from a face with full strength
    pub inner_distance: f32,
    /// Interior distance from a face where gravity reaches zero
    pub inner_falloff_distance: f32,
    /// Exterior distance from the surface with full strength
    pub outer_distance: f32,
    /// Exterior distance from the surface where gravity reaches zero
    pub outer_falloff_distance: f32,
}

impl Default for BoxSource {
    fn default() -> Self {
        Self {
            strength: 9.81,
            half_extents: Vec3::ONE,
            inner_distance: 0.0,
            inner_falloff_distance: 0.0,
            outer_distance: 0.0,
            outer_falloff_distance: 0.0,
        }
    }
}

impl BoxSource {
    /// Box with interior falloff only.
    pub fn new(strength: f32, half_extents: Vec3, inner_distance: f32, inner_falloff_distance: f32) -> Self {
        Self {
            strength,
            half_extents,
            inner_distance,
            inner_falloff_distance,
            outer_distance: 0.0,
            outer_falloff_distance: 0.0,
        }
        .sanitized()
    }

    /// Set the exterior falloff distances.
    pub fn with_outer(self, outer_distance: f32, outer_falloff_distance: f32) -> Self {
        Self {
            outer_distance,
            outer_falloff_distance,
            ..self
        }
        .sanitized()
    }

    /// Clamp distances so `inner_distance <= inner_falloff_distance <=
    /// min(half_extents)` and `outer_distance <= outer_falloff_distance`.
    pub fn sanitized(self) -> Self {
        let half_extents = self.half_extents.max(Vec3::ZERO);
        let max_inner = half_extents.min_element();
        let inner_distance = self.inner_distance.max(0.0).min(max_inner);
        let inner_falloff_distance = self.inner_falloff_distance.min(max_inner).max(inner_distance);
        let outer_distance = self.outer_distance.max(0.0);
        let outer_falloff_distance = self.outer_falloff_distance.max(outer_distance);
        Self {
            strength: self.strength,
            half_extents,
            inner_distance,
            inner_falloff_distance,
            outer_distance,
            outer_falloff_distance,
        }
    }

    /// Gravity at `point` for a box placed at `pose`.
    pub fn gravity_at(&self, pose: &Pose, point: Vec3) -> Vec3 {
        let local = pose.inverse_transform_direction(point - pose.position);
        let b = self.half_extents;

        let mut vector = Vec3::ZERO;
        let mut outside = 0;
        if local.x > b.x {
            vector.x = b.x - local.x;
            outside = 1;
        } else if local.x < -b.x {
            vector.x = -b.x - local.x;
            outside = 1;
        }
        if local.y > b.y {
            vector.y = b.y - local.y;
            outside += 1;
        } else if local.y < -b.y {
            vector.y = -b.y - local.y;
            outside += 1;
        }
        if local.z > b.z {
            vector.z = b.z - local.z;
            outside += 1;
        } else if local.z < -b.z {
            vector.z = -b.z - local.z;
            outside += 1;
        }

        if outside > 0 {
            // Single face: only one component is non-zero, so the signed sum is its length
            let distance = if outside == 1 {
                (vector.x + vector.y + vector.z).abs()
            } else {
                vector.length()
            };
            if distance > self.outer_falloff_distance {
                return Vec3::ZERO;
            }
            let mut g = self.strength / distance;
            if distance > self.outer_distance {
                g *= 1.0 - (distance - self.outer_distance) / (self.outer_falloff_distance - self.outer_distance);
            }
            return pose.transform_direction(g * vector);
        }

        let distances = b - local.abs();
        if distances.x < distances.y {
            if distances.x < distances.z {
                vector.x = self.face_component(local.x, distances.x);
            } else {
                vector.z = self.face_component(local.z, distances.z);
            }
        } else if distances.y < distances.z {
            vector.y = self.face_component(local.y, distances.y);
        } else {
            vector.z = self.face_component(local.z, distances.z);
        }
        pose.transform_direction(vector)
    }

    /// One-dimensional pull from the nearest face, signed toward the center.
    fn face_component(&self, coordinate: f32, distance_to_face: f32) -> f32 {
        if distance_to_face > self.inner_falloff_distance {
            return 0.0;
        }
        let mut g = self.strength;
        if distance_to_face > self.inner_distance {
            g *= 1.0
                - (distance_to_face - self.inner_distance)
                    / (self.inner_falloff_distance - self.inner_distance);
        }
        if coordinate > 0.0 { -g } else { g }
    }
}
