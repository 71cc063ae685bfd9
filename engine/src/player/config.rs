//! Locomotion tunables.
//!
//! All values are configurable via struct fields and serializable, so a
//! scene file can carry a controller setup.
//!
//! # Example
//!
//! ```ignore
//! use planetwalk_engine::player::LocomotionConfig;
//!
//! let config = LocomotionConfig {
//!     jump_height: 3.0,
//!     max_air_jumps: 1,
//!     ..LocomotionConfig::default()
//! };
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::physics::{LayerMask, SurfaceTags};

/// Physics parameters for the locomotion controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Top steering speed on ground and in the air (m/s)
    pub max_speed: f32,

    /// Top steering speed while climbing (m/s)
    pub max_climb_speed: f32,

    /// Steering acceleration while grounded (m/s^2)
    pub max_acceleration: f32,

    /// Steering acceleration while airborne (m/s^2)
    pub max_air_acceleration: f32,

    /// Steering acceleration while climbing (m/s^2).
    /// Also scales the pull that keeps the agent on the wall.
    pub max_climb_acceleration: f32,

    /// Apex height of a jump from rest (meters)
    pub jump_height: f32,

    /// Extra jumps allowed before touching ground again
    pub max_air_jumps: u32,

    /// Steepest walkable slope (degrees)
    pub max_ground_angle: f32,

    /// Steepest walkable slope on surfaces tagged as stairs (degrees)
    pub max_stairs_angle: f32,

    /// Steepest climbable slope, measured from up (degrees, 90..180)
    pub max_climb_angle: f32,

    /// Speed above which snap-to-ground is not attempted (m/s)
    pub max_snap_speed: f32,

    /// Length of the snap-to-ground probe (meters)
    pub probe_distance: f32,

    /// Layers the snap-to-ground probe can hit
    pub probe_mask: LayerMask,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            max_climb_speed: 2.0,
            max_acceleration: 10.0,
            max_air_acceleration: 1.0,
            max_climb_acceleration: 20.0,
            jump_height: 2.0,
            max_air_jumps: 0,
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            max_climb_angle: 140.0,
            max_snap_speed: 100.0,
            probe_distance: 1.0,
            probe_mask: LayerMask::ALL,
        }
    }
}

impl LocomotionConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    fn scalar_fields(&self) -> [(&'static str, f32); 11] {
        [
            ("max_speed", self.max_speed),
            ("max_climb_speed", self.max_climb_speed),
            ("max_acceleration", self.max_acceleration),
            ("max_air_acceleration", self.max_air_acceleration),
            ("max_climb_acceleration", self.max_climb_acceleration),
            ("jump_height", self.jump_height),
            ("max_ground_angle", self.max_ground_angle),
            ("max_stairs_angle", self.max_stairs_angle),
            ("max_climb_angle", self.max_climb_angle),
            ("max_snap_speed", self.max_snap_speed),
            ("probe_distance", self.probe_distance),
        ]
    }

    /// Reject values that no clamping can repair (NaN, infinities, negatives).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.scalar_fields() {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Clamp angles into their meaningful ranges.
    ///
    /// Ground and stairs angles live in `[0, 90]`, the climb angle in
    /// `[90, 180]`. Every adjustment is logged.
    pub fn sanitized(self) -> Self {
        let mut out = self;
        out.max_ground_angle = clamp_logged("max_ground_angle", self.max_ground_angle, 0.0, 90.0);
        out.max_stairs_angle = clamp_logged("max_stairs_angle", self.max_stairs_angle, 0.0, 90.0);
        out.max_climb_angle = clamp_logged("max_climb_angle", self.max_climb_angle, 90.0, 180.0);
        out
    }

    /// Minimum `dot(up, normal)` for walkable ground.
    pub fn min_ground_dot(&self) -> f32 {
        self.max_ground_angle.to_radians().cos()
    }

    /// Minimum `dot(up, normal)` for walkable stairs.
    pub fn min_stairs_dot(&self) -> f32 {
        self.max_stairs_angle.to_radians().cos()
    }

    /// Minimum `dot(up, normal)` for climbable walls.
    pub fn min_climb_dot(&self) -> f32 {
        self.max_climb_angle.to_radians().cos()
    }

    /// Ground threshold for a surface with the given tags.
    pub fn min_dot_for(&self, tags: SurfaceTags) -> f32 {
        if tags.contains(SurfaceTags::STAIRS) {
            self.min_stairs_dot()
        } else {
            self.min_ground_dot()
        }
    }

    /// Launch speed that reaches `jump_height` against `gravity_magnitude`.
    pub fn jump_speed(&self, gravity_magnitude: f32) -> f32 {
        (2.0 * gravity_magnitude * self.jump_height).sqrt()
    }
}

fn clamp_logged(field: &'static str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.max(min).min(max);
    if clamped != value {
        warn!(field, value, clamped, "locomotion config value out of range");
    }
    clamped
}
