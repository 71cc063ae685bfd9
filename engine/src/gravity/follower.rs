//! Gravity follower
//!
//! Applies field gravity to a passive body each step (crates, debris). With
//! `float_to_sleep` enabled the follower stops pushing a body that has been
//! at rest for a while, so it can settle and sleep instead of jittering.

use tracing::trace;

use super::field::GravityField;
use crate::physics::AgentBody;

/// Seconds at rest before a floating body stops receiving gravity
pub const FLOAT_TO_SLEEP_DELAY: f32 = 1.0;

/// Squared speed below which a body counts as at rest
pub const REST_SPEED_SQUARED: f32 = 0.0001;

/// Per-body gravity integrator.
#[derive(Debug, Clone, Default)]
pub struct GravityFollower {
    /// Stop applying gravity to bodies that stay at rest
    pub float_to_sleep: bool,
    float_delay: f32,
}

impl GravityFollower {
    /// Create a follower.
    pub fn new(float_to_sleep: bool) -> Self {
        Self {
            float_to_sleep,
            float_delay: 0.0,
        }
    }

    /// Seconds the body has spent at rest.
    pub fn float_delay(&self) -> f32 {
        self.float_delay
    }

    /// Apply one step of field gravity. Returns whether gravity was applied.
    pub fn step(&mut self, dt: f32, field: &GravityField, body: &mut impl AgentBody) -> bool {
        if self.float_to_sleep {
            if body.is_sleeping() {
                self.float_delay = 0.0;
                return false;
            }
            if body.velocity().length_squared() < REST_SPEED_SQUARED {
                self.float_delay += dt;
                if self.float_delay >= FLOAT_TO_SLEEP_DELAY {
                    trace!(delay = self.float_delay, "body floating to sleep");
                    return false;
                }
            } else {
                self.float_delay = 0.0;
            }
        }
        let gravity = field.gravity(body.position());
        body.set_velocity(body.velocity() + gravity * dt);
        true
    }
}
