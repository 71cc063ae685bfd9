//! Collaborator contracts
//!
//! The locomotion core does not own a collision engine. It consumes contacts,
//! raycasts and body lookups through the types and traits in this module,
//! and reads/writes the agent's velocity through [`AgentBody`].

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::types::Pose;

/// Gameplay tags attached to a collision surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SurfaceTags(pub u32);

impl SurfaceTags {
    /// No tags.
    pub const NONE: Self = Self(0);

    /// Stairs - walkable at the steeper stairs angle.
    pub const STAIRS: Self = Self(1 << 0);

    /// Climbable wall.
    pub const CLIMBABLE: Self = Self(1 << 1);

    /// Check if all of `other` is set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for SurfaceTags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Bit set of collision layers (0..32) a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl LayerMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);

    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing a single layer.
    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    /// Whether `layer` is set in this mask.
    #[inline]
    pub fn contains_layer(self, layer: u8) -> bool {
        (self.0 & 1u32.checked_shl(layer as u32).unwrap_or(0)) != 0
    }
}

/// Opaque reference to a body in the host's body table.
///
/// Never owning; resolve it through [`PhysicsQueries::body`] each step, which
/// returns `None` once the body is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Snapshot of a body that the agent may stand on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Current placement
    pub pose: Pose,
    /// Mass in kg (ignored when kinematic)
    pub mass: f32,
    /// Moved by script rather than by forces (effectively infinite mass)
    pub kinematic: bool,
}

impl BodyState {
    /// Kinematic body at `position` with no rotation.
    pub fn kinematic(position: Vec3) -> Self {
        Self {
            pose: Pose::from_position(position),
            mass: f32::INFINITY,
            kinematic: true,
        }
    }

    /// Dynamic body with the given pose and mass.
    pub fn dynamic(position: Vec3, rotation: Quat, mass: f32) -> Self {
        Self {
            pose: Pose::new(position, rotation),
            mass,
            kinematic: false,
        }
    }

    /// Whether an agent of `agent_mass` should be carried along by this body.
    pub fn can_carry(&self, agent_mass: f32) -> bool {
        self.kinematic || self.mass >= agent_mass
    }
}

/// One contact reported by the collision engine for the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Surface normal pointing toward the agent
    pub normal: Vec3,
    /// Tags of the touched surface
    pub tags: SurfaceTags,
    /// Body owning the touched collider, if it is not static geometry
    pub body: Option<BodyHandle>,
}

impl Contact {
    /// Contact with untagged static geometry.
    pub fn new(normal: Vec3) -> Self {
        Self {
            normal,
            tags: SurfaceTags::NONE,
            body: None,
        }
    }

    /// Set the surface tags.
    pub fn with_tags(mut self, tags: SurfaceTags) -> Self {
        self.tags = tags;
        self
    }

    /// Set the owning body.
    pub fn with_body(mut self, body: BodyHandle) -> Self {
        self.body = Some(body);
        self
    }
}

/// Nearest hit of a raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Distance from the ray origin
    pub distance: f32,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Tags of the hit surface
    pub tags: SurfaceTags,
    /// Body owning the hit collider
    pub body: Option<BodyHandle>,
}

/// Scene queries supplied by the host's collision engine.
///
/// A miss (`None` / `false`) is always a valid answer, never an error.
pub trait PhysicsQueries {
    /// Nearest hit along `direction` (unit length) within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RaycastHit>;

    /// Whether any collider in `mask` overlaps the sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// Current state of a body, or `None` if the handle is stale.
    fn body(&self, handle: BodyHandle) -> Option<BodyState>;
}

/// Rigid-body proxy for the agent (or any gravity-driven body).
pub trait AgentBody {
    /// World-space center.
    fn position(&self) -> Vec3;

    /// Current linear velocity.
    fn velocity(&self) -> Vec3;

    /// Overwrite the linear velocity.
    fn set_velocity(&mut self, velocity: Vec3);

    /// Mass in kg.
    fn mass(&self) -> f32;

    /// Whether the collision engine put the body to sleep.
    fn is_sleeping(&self) -> bool {
        false
    }
}

static_assertions::assert_eq_size!(BodyHandle, u32);
