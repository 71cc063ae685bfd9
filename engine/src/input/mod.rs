//! Input Module
//!
//! Per-frame movement input, decoupled from any windowing system. Visual
//! frames and simulation steps run at different rates, so jump requests are
//! latched here until a step consumes them.
//!
//! # Example
//!
//! ```rust,ignore
//! use planetwalk_engine::input::{MovementInput, MovementKeys};
//!
//! let mut input = MovementInput::new();
//!
//! // Every visual frame:
//! input.apply_keys(&keys);
//!
//! // Every simulation step:
//! controller.set_move_input(input.axes());
//! if input.take_jump() {
//!     controller.request_jump();
//! }
//! ```

use glam::Vec2;

/// Digital movement keys held this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementKeys {
    /// Move forward
    pub forward: bool,
    /// Move backward
    pub backward: bool,
    /// Strafe left
    pub left: bool,
    /// Strafe right
    pub right: bool,
    /// Jump (pressed this frame)
    pub jump: bool,
}

impl MovementKeys {
    /// Create a movement keys state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward/backward axis value (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Right/left axis value (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }
}

/// Latched movement input.
///
/// Axes are overwritten every frame; jump requests are OR'd together and
/// stay set until [`take_jump`](Self::take_jump) consumes them, so a press
/// between two simulation steps is never dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementInput {
    axes: Vec2,
    jump_requested: bool,
}

impl MovementInput {
    /// Create an input state with centered axes and no pending jump.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set analog axes (`x` = right, `y` = forward), clamped to unit length.
    pub fn set_axes(&mut self, horizontal: f32, vertical: f32) {
        self.axes = Vec2::new(horizontal, vertical).clamp_length_max(1.0);
    }

    /// Update from digital keys.
    pub fn apply_keys(&mut self, keys: &MovementKeys) {
        self.set_axes(keys.right_axis() as f32, keys.forward_axis() as f32);
        if keys.jump {
            self.request_jump();
        }
    }

    /// Latch a jump request.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Current axes (`x` = right, `y` = forward), length <= 1.
    pub fn axes(&self) -> Vec2 {
        self.axes
    }

    /// Whether a jump is pending.
    pub fn jump_pending(&self) -> bool {
        self.jump_requested
    }

    /// Consume the pending jump request.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }
}
