//! Plane gravity
//!
//! Uniform pull along the plane's local -Y. Full strength on and below the
//! plane, fading linearly to zero at `range` above it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::Pose;

/// Geometry and strength of a planar gravity emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneSource {
    /// Acceleration at full strength (m/s^2)
    pub strength: f32,
    /// Height above the plane where gravity reaches zero (meters)
    pub range: f32,
}

impl Default for PlaneSource {
    fn default() -> Self {
        Self {
            strength: 9.81,
            range: 1.0,
        }
    }
}

impl PlaneSource {
    /// Create a plane source. Negative ranges are clamped to zero.
    pub fn new(strength: f32, range: f32) -> Self {
        Self { strength, range }.sanitized()
    }

    /// Re-establish `range >= 0`.
    pub fn sanitized(self) -> Self {
        Self {
            range: self.range.max(0.0),
            ..self
        }
    }

    /// Gravity at `point` for a plane placed at `pose`.
    pub fn gravity_at(&self, pose: &Pose, point: Vec3) -> Vec3 {
        let up = pose.up();
        let distance = up.dot(point - pose.position);
        if distance > self.range {
            return Vec3::ZERO;
        }
        let mut g = self.strength;
        // distance > 0 implies range > 0 here
        if distance > 0.0 {
            g *= 1.0 - distance / self.range;
        }
        -g * up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_on_plane_full_strength() {
        let plane = PlaneSource::new(9.81, 0.0);
        let g = plane.gravity_at(&Pose::IDENTITY, Vec3::new(4.0, 0.0, -2.0));
        assert!((g - Vec3::new(0.0, -9.81, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_below_plane_full_strength() {
        let plane = PlaneSource::new(9.81, 2.0);
        let g = plane.gravity_at(&Pose::IDENTITY, Vec3::new(0.0, -50.0, 0.0));
        assert!((g.y + 9.81).abs() < 1e-5);
    }

    #[test]
    fn test_linear_fade_to_range() {
        let plane = PlaneSource::new(10.0, 4.0);
        let half = plane.gravity_at(&Pose::IDENTITY, Vec3::new(0.0, 2.0, 0.0));
        assert!((half.y + 5.0).abs() < 1e-5);

        let edge = plane.gravity_at(&Pose::IDENTITY, Vec3::new(0.0, 4.0, 0.0));
        assert!(edge.length() < 1e-6);

        let beyond = plane.gravity_at(&Pose::IDENTITY, Vec3::new(0.0, 4.01, 0.0));
        assert_eq!(beyond, Vec3::ZERO);
    }

    #[test]
    fn test_rotated_plane_pulls_along_local_down() {
        // Plane rotated so its up axis is world +X
        let pose = Pose::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2),
        );
        let plane = PlaneSource::new(9.81, 1.0);
        let g = plane.gravity_at(&pose, Vec3::new(1.0, 3.0, 0.0));
        assert!((g - Vec3::new(-9.81, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_negative_range_clamped() {
        let plane = PlaneSource::new(9.81, -3.0);
        assert_eq!(plane.range, 0.0);
    }
}
