//! Player Module
//!
//! Agent locomotion on arbitrary gravity.
//!
//! # Components
//!
//! - [`LocomotionController`] - Walk, jump, climb, snap and ride platforms
//!   - Classifies each step as climbing, grounded, steep or airborne
//!   - Steers relative to an optional input space (e.g. camera)
//! - [`LocomotionConfig`] - Serializable tunables with validation
//! - [`ContactState`] - Per-step contact accumulation
//! - [`PlatformAttachment`] - Moving platform velocity tracking

pub mod config;
pub mod contacts;
pub mod movement_controller;
pub mod platform;

pub use config::LocomotionConfig;
pub use contacts::{ContactClass, ContactState, ContactThresholds, STEEP_MIN_UP_DOT};
pub use movement_controller::{CLIMB_GRIP_FACTOR, GroundSupport, LocomotionController, LocomotionState};
pub use platform::PlatformAttachment;
