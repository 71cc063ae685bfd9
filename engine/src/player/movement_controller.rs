//! Locomotion Controller
//!
//! Physics-driven agent controller for worlds where "down" is whatever the
//! [`GravityField`] says it is at the agent's position. It walks, jumps,
//! climbs, snaps to the ground over small bumps, and rides moving platforms.
//!
//! # Step Model
//!
//! The host collision engine owns the agent body. Each fixed step:
//!
//! 1. The host reports this step's contacts via
//!    [`evaluate_collision`](LocomotionController::evaluate_collision).
//! 2. [`step`](LocomotionController::step) classifies the agent, steers,
//!    jumps, applies gravity and writes the new velocity to the body.
//! 3. The host integrates the body.
//!
//! Classification has a fixed precedence:
//! `Climbing → Grounded(contact) → Grounded(snap) → Grounded(steep merge) → Steep/Airborne`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use planetwalk_engine::player::{LocomotionConfig, LocomotionController};
//!
//! let mut controller = LocomotionController::new(LocomotionConfig::default())?;
//!
//! // Each fixed step:
//! controller.evaluate_collision(&contacts);
//! controller.set_move_input(input.axes());
//! if input.take_jump() {
//!     controller.request_jump();
//! }
//! let state = controller.step(dt, &field, &world, &mut body);
//! ```

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::config::LocomotionConfig;
use super::contacts::{ContactState, ContactThresholds};
use super::platform::PlatformAttachment;
use crate::error::ConfigError;
use crate::gravity::GravityField;
use crate::physics::{AgentBody, BodyHandle, Contact, PhysicsQueries};

/// Fraction of the climb acceleration used to press the agent into the wall
/// while climbing (replaces gravity).
pub const CLIMB_GRIP_FACTOR: f32 = 0.9;

/// What established ground contact this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundSupport {
    /// Direct contact with walkable ground
    Contact,
    /// Probe found ground just below after losing contact
    Snap,
    /// Several steep contacts that together form a walkable crease
    SteepMerge,
}

/// Classification of the agent after a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionState {
    /// Holding on to a climbable surface
    Climbing,
    /// Standing on something walkable
    Grounded(GroundSupport),
    /// Touching only surfaces too steep to stand on
    Steep,
    /// No support at all
    #[default]
    Airborne,
}

impl LocomotionState {
    /// Whether the agent has support it can steer and jump from.
    /// Climbing counts as grounded.
    pub fn is_grounded(self) -> bool {
        matches!(self, Self::Climbing | Self::Grounded(_))
    }
}

/// Source of the steering target.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Steering {
    /// Axes in input space (`x` = right, `y` = forward), scaled by the active top speed
    Input(Vec2),
    /// World-space velocity, projected onto the steering axes
    Velocity(Vec3),
}

/// Gravity-aware walking, jumping and climbing controller.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    thresholds: ContactThresholds,

    /// Working velocity for the current step
    velocity: Vec3,

    steering: Steering,

    /// Steering target the last step moved toward, in world space
    desired_velocity: Vec3,

    /// Orientation whose X/Z axes define right/forward for input
    input_space: Option<Quat>,

    /// Up axis at the agent's last evaluated position
    up_axis: Vec3,

    /// Net gravity at the agent's last evaluated position
    gravity: Vec3,

    right_axis: Vec3,
    forward_axis: Vec3,

    contacts: ContactState,
    platform: PlatformAttachment,

    /// Contact normal the last step steered along
    last_contact_normal: Vec3,

    jump_requested: bool,
    jump_phase: u32,
    steps_since_last_grounded: u32,
    steps_since_last_jump: u32,

    state: LocomotionState,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self::with_valid_config(LocomotionConfig::default())
    }
}

impl LocomotionController {
    /// Create a controller, rejecting unusable configuration.
    pub fn new(config: LocomotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config.sanitized()))
    }

    fn with_valid_config(config: LocomotionConfig) -> Self {
        Self {
            config,
            thresholds: thresholds_for(&config),
            velocity: Vec3::ZERO,
            steering: Steering::Input(Vec2::ZERO),
            desired_velocity: Vec3::ZERO,
            input_space: None,
            up_axis: Vec3::Y,
            gravity: Vec3::ZERO,
            right_axis: Vec3::X,
            forward_axis: Vec3::Z,
            contacts: ContactState::default(),
            platform: PlatformAttachment::default(),
            last_contact_normal: Vec3::Y,
            jump_requested: false,
            jump_phase: 0,
            steps_since_last_grounded: 0,
            steps_since_last_jump: 0,
            state: LocomotionState::Airborne,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Replace the configuration. Runtime state is kept.
    pub fn set_config(&mut self, config: LocomotionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config.sanitized();
        self.thresholds = thresholds_for(&self.config);
        Ok(())
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Request a jump on the next step. Requests stay latched until a step
    /// consumes them.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Whether a jump is waiting for the next step.
    pub fn jump_pending(&self) -> bool {
        self.jump_requested
    }

    /// Set the desired velocity directly, in world space.
    ///
    /// Only its components along the steering axes matter. While climbing
    /// its components along the wall are scaled by
    /// `max_climb_speed / max_speed`.
    pub fn set_desired_velocity(&mut self, desired: Vec3) {
        self.steering = Steering::Velocity(desired);
    }

    /// Steer from input axes (`x` = right, `y` = forward).
    ///
    /// The axes are clamped to unit length and scaled by `max_speed`, or
    /// `max_climb_speed` while climbing.
    pub fn set_move_input(&mut self, axes: Vec2) {
        self.steering = Steering::Input(axes.clamp_length_max(1.0));
    }

    /// Orientation whose X/Z axes are "right" and "forward" for input,
    /// typically the camera. `None` uses world X/Z.
    pub fn set_input_space(&mut self, space: Option<Quat>) {
        self.input_space = space;
    }

    /// Read gravity and the up axis at `position` without stepping.
    ///
    /// Contacts are classified against the up axis of the previous step, so
    /// call this once after spawning or teleporting the agent, before feeding
    /// its first contacts. Where gravity vanishes the previous up axis stays.
    pub fn orient(&mut self, field: &GravityField, position: Vec3) {
        let (gravity, up_axis) = field.gravity_and_up(position);
        self.gravity = gravity;
        if up_axis != Vec3::ZERO {
            self.up_axis = up_axis;
        }
        self.update_input_axes();
    }

    /// Feed contacts reported by the collision engine for the coming step.
    ///
    /// May be called any number of times per step; contacts accumulate.
    /// Classification uses the up axis from the previous step.
    pub fn evaluate_collision(&mut self, contacts: &[Contact]) {
        for contact in contacts {
            self.add_contact(contact);
        }
    }

    /// Classify and accumulate a single contact.
    pub fn add_contact(&mut self, contact: &Contact) {
        let class = self.contacts.accumulate(contact, self.up_axis, &self.thresholds);
        if class.ground {
            self.platform.connect(contact.body);
            return;
        }
        if class.steep && !self.contacts.on_ground() {
            self.platform.connect(contact.body);
        }
        if class.climb {
            self.platform.connect(contact.body);
        }
    }

    // ========================================================================
    // Step
    // ========================================================================

    /// Advance the controller by one fixed step of `dt` seconds.
    ///
    /// Reads gravity at the body's position, consumes the contacts gathered
    /// since the previous step and writes the resulting velocity back to
    /// `body`. A non-positive or non-finite `dt` leaves everything untouched.
    pub fn step<W, B>(&mut self, dt: f32, field: &GravityField, world: &W, body: &mut B) -> LocomotionState
    where
        W: PhysicsQueries,
        B: AgentBody,
    {
        if !(dt > 0.0 && dt.is_finite()) {
            return self.state;
        }
        debug_assert!(body.mass() > 0.0, "agent mass must be positive, got {}", body.mass());

        self.orient(field, body.position());

        let previous_state = self.state;
        self.update_state(dt, world, body);
        self.adjust_velocity(dt);

        if std::mem::take(&mut self.jump_requested) {
            self.jump();
        }

        if self.state == LocomotionState::Climbing {
            let grip = self.config.max_climb_acceleration * CLIMB_GRIP_FACTOR * dt;
            self.velocity -= self.contacts.contact_normal * grip;
        } else {
            self.velocity += self.gravity * dt;
        }
        body.set_velocity(self.velocity);

        if self.state != previous_state {
            debug!(from = ?previous_state, to = ?self.state, "locomotion state changed");
        }
        trace!(
            state = ?self.state,
            velocity = ?self.velocity,
            up = ?self.up_axis,
            jump_phase = self.jump_phase,
            "locomotion step"
        );

        self.clear_state();
        self.state
    }

    fn update_input_axes(&mut self) {
        let (right, forward) = match self.input_space {
            Some(space) => (space * Vec3::X, space * Vec3::Z),
            None => (Vec3::X, Vec3::Z),
        };
        let mut right = project_direction_on_plane(right, self.up_axis);
        let mut forward = project_direction_on_plane(forward, self.up_axis);
        // Input space looking straight along the up axis loses one direction
        if right == Vec3::ZERO {
            right = self.up_axis.cross(forward).normalize_or_zero();
        }
        if forward == Vec3::ZERO {
            forward = right.cross(self.up_axis).normalize_or_zero();
        }
        self.right_axis = right;
        self.forward_axis = forward;
    }

    fn update_state<W: PhysicsQueries, B: AgentBody>(&mut self, dt: f32, world: &W, body: &B) {
        self.steps_since_last_grounded = self.steps_since_last_grounded.saturating_add(1);
        self.steps_since_last_jump = self.steps_since_last_jump.saturating_add(1);
        self.velocity = body.velocity();

        let support = if self.contacts.merge_climb(self.up_axis, self.thresholds.min_ground_dot) {
            Some(LocomotionState::Climbing)
        } else if self.contacts.on_ground() {
            Some(LocomotionState::Grounded(GroundSupport::Contact))
        } else if self.snap_to_ground(world, body.position()) {
            Some(LocomotionState::Grounded(GroundSupport::Snap))
        } else if self.contacts.merge_steep(self.up_axis, self.thresholds.min_ground_dot) {
            Some(LocomotionState::Grounded(GroundSupport::SteepMerge))
        } else {
            None
        };

        match support {
            Some(state) => {
                self.steps_since_last_grounded = 0;
                if self.steps_since_last_jump > 1 {
                    self.jump_phase = 0;
                }
                if self.contacts.ground_count > 1 {
                    self.contacts.contact_normal = self.contacts.contact_normal.normalize_or_zero();
                }
                if self.contacts.contact_normal == Vec3::ZERO {
                    // Opposing ground normals cancelled out
                    self.contacts.contact_normal = self.up_axis;
                }
                self.state = state;
            }
            None => {
                self.contacts.contact_normal = self.up_axis;
                self.state = if self.contacts.on_steep() {
                    LocomotionState::Steep
                } else {
                    LocomotionState::Airborne
                };
            }
        }

        self.platform.update(world, body.position(), body.mass(), dt);
    }

    fn snap_to_ground<W: PhysicsQueries>(&mut self, world: &W, position: Vec3) -> bool {
        if self.steps_since_last_grounded > 1 || self.steps_since_last_jump <= 2 {
            return false;
        }
        let speed = self.velocity.length();
        if speed > self.config.max_snap_speed {
            return false;
        }
        let Some(hit) = world.raycast(position, -self.up_axis, self.config.probe_distance, self.config.probe_mask)
        else {
            return false;
        };
        if self.up_axis.dot(hit.normal) < self.thresholds.min_dot_for(hit.tags) {
            return false;
        }

        self.contacts.ground_count = 1;
        self.contacts.contact_normal = hit.normal;
        let dot = self.velocity.dot(hit.normal);
        if dot > 0.0 {
            self.velocity = (self.velocity - hit.normal * dot).normalize_or_zero() * speed;
        }
        self.platform.connect(hit.body);
        true
    }

    fn adjust_velocity(&mut self, dt: f32) {
        let contact_normal = self.contacts.contact_normal;
        let climbing = self.state == LocomotionState::Climbing;

        let (acceleration, speed, x_axis, z_axis) = if climbing {
            (
                self.config.max_climb_acceleration,
                self.config.max_climb_speed,
                contact_normal.cross(self.up_axis),
                self.up_axis,
            )
        } else {
            let acceleration = if self.state.is_grounded() {
                self.config.max_acceleration
            } else {
                self.config.max_air_acceleration
            };
            (acceleration, self.config.max_speed, self.right_axis, self.forward_axis)
        };
        let x_axis = project_direction_on_plane(x_axis, contact_normal);
        let z_axis = project_direction_on_plane(z_axis, contact_normal);

        let relative = self.velocity - self.platform.velocity();
        let current_x = relative.dot(x_axis);
        let current_z = relative.dot(z_axis);

        let target = self.steering_target(speed, climbing, x_axis, z_axis);
        self.desired_velocity = x_axis * target.x + z_axis * target.y;
        let max_change = acceleration * dt;
        let new_x = move_towards(current_x, target.x, max_change);
        let new_z = move_towards(current_z, target.y, max_change);

        self.velocity += x_axis * (new_x - current_x) + z_axis * (new_z - current_z);
    }

    /// Target speeds along `x_axis` / `z_axis`.
    ///
    /// World-space velocities are read along the walking axes, or along the
    /// climb axes themselves while climbing, scaled down to climb speed.
    fn steering_target(&self, speed: f32, climbing: bool, x_axis: Vec3, z_axis: Vec3) -> Vec2 {
        match self.steering {
            Steering::Input(axes) => axes * speed,
            Steering::Velocity(desired) if climbing => {
                let scale = if self.config.max_speed > 0.0 {
                    self.config.max_climb_speed / self.config.max_speed
                } else {
                    0.0
                };
                Vec2::new(desired.dot(x_axis), desired.dot(z_axis)) * scale
            }
            Steering::Velocity(desired) => Vec2::new(desired.dot(self.right_axis), desired.dot(self.forward_axis)),
        }
    }

    fn jump(&mut self) {
        let direction = if self.contacts.on_ground() {
            self.contacts.contact_normal
        } else if self.contacts.on_steep() {
            self.jump_phase = 0;
            self.contacts.steep_normal
        } else if self.config.max_air_jumps > 0 && self.jump_phase <= self.config.max_air_jumps {
            if self.jump_phase == 0 {
                self.jump_phase = 1;
            }
            self.contacts.contact_normal
        } else {
            return;
        };

        self.steps_since_last_jump = 0;
        self.jump_phase += 1;

        let mut jump_speed = self.config.jump_speed(self.gravity.length());
        let mut direction = (direction + self.up_axis).normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = self.up_axis;
        }
        let aligned_speed = self.velocity.dot(direction);
        if aligned_speed > 0.0 {
            jump_speed = (jump_speed - aligned_speed).max(0.0);
        }
        self.velocity += direction * jump_speed;
        debug!(direction = ?direction, speed = jump_speed, jump_phase = self.jump_phase, "jump");
    }

    fn clear_state(&mut self) {
        self.last_contact_normal = self.contacts.contact_normal;
        self.contacts.clear();
        self.platform.end_step();
    }

    /// Forget all runtime state (velocity, counters, contacts, platform, input).
    /// Configuration and input space are kept.
    pub fn reset(&mut self) {
        *self = Self {
            input_space: self.input_space,
            ..Self::with_valid_config(self.config)
        };
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Classification from the last step.
    pub fn state(&self) -> LocomotionState {
        self.state
    }

    /// Velocity written to the body by the last step.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity the last step steered toward, relative to any platform.
    ///
    /// Lies in the contact plane, and uses climb speed and axes while climbing.
    pub fn desired_velocity(&self) -> Vec3 {
        self.desired_velocity
    }

    /// Contact normal the last step steered along (the up axis when airborne).
    pub fn contact_normal(&self) -> Vec3 {
        self.last_contact_normal
    }

    /// Up axis at the agent's position as of the last step.
    pub fn up_axis(&self) -> Vec3 {
        self.up_axis
    }

    /// Net gravity at the agent's position as of the last step.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Right input axis on the plane perpendicular to up.
    pub fn right_axis(&self) -> Vec3 {
        self.right_axis
    }

    /// Forward input axis on the plane perpendicular to up.
    pub fn forward_axis(&self) -> Vec3 {
        self.forward_axis
    }

    /// Grounded or climbing after the last step.
    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded()
    }

    /// Only steep contacts after the last step.
    pub fn is_on_steep(&self) -> bool {
        self.state == LocomotionState::Steep
    }

    /// Climbing after the last step.
    pub fn is_climbing(&self) -> bool {
        self.state == LocomotionState::Climbing
    }

    /// Jumps since last touching ground, air jumps included.
    pub fn jump_phase(&self) -> u32 {
        self.jump_phase
    }

    /// Steps since the agent last had support.
    pub fn steps_since_last_grounded(&self) -> u32 {
        self.steps_since_last_grounded
    }

    /// Steps since the last jump.
    pub fn steps_since_last_jump(&self) -> u32 {
        self.steps_since_last_jump
    }

    /// Platform the agent stood on during the last step.
    pub fn connected_body(&self) -> Option<BodyHandle> {
        self.platform.previous()
    }

    /// Contacts accumulated so far for the coming step.
    pub fn pending_contacts(&self) -> &ContactState {
        &self.contacts
    }
}

fn thresholds_for(config: &LocomotionConfig) -> ContactThresholds {
    ContactThresholds {
        min_ground_dot: config.min_ground_dot(),
        min_stairs_dot: config.min_stairs_dot(),
        min_climb_dot: config.min_climb_dot(),
    }
}

/// Unit projection of `direction` onto the plane with `normal`, or zero.
fn project_direction_on_plane(direction: Vec3, normal: Vec3) -> Vec3 {
    (direction - normal * direction.dot(normal)).normalize_or_zero()
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}
