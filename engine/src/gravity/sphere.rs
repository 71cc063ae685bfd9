//! Sphere (shell) gravity
//!
//! Pulls toward the center with magnitude `strength / distance` between the
//! inner and outer radius, fading linearly to zero across the two falloff
//! bands. The inverse-distance profile is intentional; it keeps the force at
//! `strength` on the shell surface regardless of radius.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::Pose;

/// Radii must satisfy `inner_falloff_radius <= inner_radius <= outer_radius
/// <= outer_falloff_radius`; [`SphereSource::sanitized`] restores this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereSource {
    /// Acceleration scale (m/s^2 at the shell surface)
    pub strength: f32,
    /// Gravity is zero closer than this to the center
    pub inner_falloff_radius: f32,
    /// Full strength from here outward
    pub inner_radius: f32,
    /// Full strength up to here
    pub outer_radius: f32,
    /// Gravity is zero beyond this
    pub outer_falloff_radius: f32,
}

impl Default for SphereSource {
    fn default() -> Self {
        Self {
            strength: 9.81,
            inner_falloff_radius: 1.0,
            inner_radius: 5.0,
            outer_radius: 10.0,
            outer_falloff_radius: 15.0,
        }
    }
}

impl SphereSource {
    /// Solid planet: full strength from the center out to `outer_radius`.
    pub fn new(strength: f32, outer_radius: f32, outer_falloff_radius: f32) -> Self {
        Self {
            strength,
            inner_falloff_radius: 0.0,
            inner_radius: 0.0,
            outer_radius,
            outer_falloff_radius,
        }
        .sanitized()
    }

    /// Hollow shell with falloff on both sides.
    pub fn shell(
        strength: f32,
        inner_falloff_radius: f32,
        inner_radius: f32,
        outer_radius: f32,
        outer_falloff_radius: f32,
    ) -> Self {
        Self {
            strength,
            inner_falloff_radius,
            inner_radius,
            outer_radius,
            outer_falloff_radius,
        }
        .sanitized()
    }

    /// Clamp radii into non-decreasing order, each at least zero.
    pub fn sanitized(self) -> Self {
        let inner_falloff_radius = self.inner_falloff_radius.max(0.0);
        let inner_radius = self.inner_radius.max(inner_falloff_radius);
        let outer_radius = self.outer_radius.max(inner_radius);
        let outer_falloff_radius = self.outer_falloff_radius.max(outer_radius);
        Self {
            strength: self.strength,
            inner_falloff_radius,
            inner_radius,
            outer_radius,
            outer_falloff_radius,
        }
    }

    /// Gravity at `point` for a sphere centered at `pose.position`.
    pub fn gravity_at(&self, pose: &Pose, point: Vec3) -> Vec3 {
        let offset = pose.position - point;
        let distance = offset.length();
        if distance > self.outer_falloff_radius
            || distance < self.inner_falloff_radius
            || distance <= f32::EPSILON
        {
            return Vec3::ZERO;
        }
        let mut g = self.strength / distance;
        // Band widths are non-zero whenever these branches are reachable
        if distance > self.outer_radius {
            g *= 1.0 - (distance - self.outer_radius) / (self.outer_falloff_radius - self.outer_radius);
        } else if distance < self.inner_radius {
            g *= 1.0 - (self.inner_radius - distance) / (self.inner_radius - self.inner_falloff_radius);
        }
        g * offset
    }
}
