//! Moving-platform tracking.
//!
//! The agent remembers where it stood on a body last step, in that body's
//! local frame. If it is still on the same body this step, the distance that
//! point travelled gives the platform velocity, which steering then uses as
//! its baseline. Rotation is part of the body pose, so spinning platforms
//! carry the agent around as well.

use glam::Vec3;
use tracing::debug;

use crate::physics::{BodyHandle, PhysicsQueries};

/// Single-step memory of the body the agent is standing on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformAttachment {
    connected: Option<BodyHandle>,
    previous: Option<BodyHandle>,
    world_position: Vec3,
    local_position: Vec3,
    velocity: Vec3,
}

impl Default for PlatformAttachment {
    fn default() -> Self {
        Self {
            connected: None,
            previous: None,
            world_position: Vec3::ZERO,
            local_position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }
}

impl PlatformAttachment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the body behind the latest qualifying contact.
    ///
    /// `None` means static geometry and replaces any earlier candidate.
    pub fn connect(&mut self, body: Option<BodyHandle>) {
        self.connected = body;
    }

    /// Body the agent is attached to this step.
    pub fn connected(&self) -> Option<BodyHandle> {
        self.connected
    }

    /// Body the agent was attached to last step.
    pub fn previous(&self) -> Option<BodyHandle> {
        self.previous
    }

    /// Platform velocity estimated this step (zero when unattached).
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Refresh the attachment point and, when the body is unchanged since
    /// last step, derive its velocity.
    ///
    /// Bodies lighter than the agent are ignored. A handle the world no
    /// longer resolves drops the attachment.
    pub fn update<W: PhysicsQueries>(&mut self, world: &W, agent_position: Vec3, agent_mass: f32, dt: f32) {
        let Some(handle) = self.connected else {
            return;
        };
        let Some(state) = world.body(handle) else {
            debug!(body = handle.0, "platform body no longer exists");
            self.connected = None;
            return;
        };
        if !state.can_carry(agent_mass) {
            return;
        }

        if self.previous == Some(handle) {
            let movement = state.pose.transform_point(self.local_position) - self.world_position;
            self.velocity = movement / dt;
        }
        self.world_position = agent_position;
        self.local_position = state.pose.inverse_transform_point(agent_position);
    }

    /// Roll over to the next step.
    pub fn end_step(&mut self) {
        if self.connected != self.previous {
            match self.connected {
                Some(body) => debug!(body = body.0, "attached to platform"),
                None => debug!("detached from platform"),
            }
        }
        self.velocity = Vec3::ZERO;
        self.previous = self.connected;
        self.connected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyState, Pose, Quat, StaticWorld};

    const DT: f32 = 0.02;

    #[test]
    fn test_first_step_has_no_velocity() {
        let mut world = StaticWorld::new();
        let body = world.add_body(BodyState::kinematic(Vec3::ZERO));
        let mut platform = PlatformAttachment::new();

        platform.connect(Some(body));
        platform.update(&world, Vec3::Y, 1.0, DT);
        assert_eq!(platform.velocity(), Vec3::ZERO);
        platform.end_step();
        assert_eq!(platform.previous(), Some(body));
        assert_eq!(platform.connected(), None);
    }

    #[test]
    fn test_translating_platform_velocity() {
        let mut world = StaticWorld::new();
        let body = world.add_body(BodyState::kinematic(Vec3::ZERO));
        let mut platform = PlatformAttachment::new();

        platform.connect(Some(body));
        platform.update(&world, Vec3::Y, 1.0, DT);
        platform.end_step();

        world.set_body_pose(body, Pose::from_position(Vec3::new(0.1, 0.0, 0.0)));
        platform.connect(Some(body));
        platform.update(&world, Vec3::Y, 1.0, DT);
        assert!((platform.velocity() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);

        platform.end_step();
        assert_eq!(platform.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_rotating_platform_velocity() {
        let mut world = StaticWorld::new();
        let body = world.add_body(BodyState::kinematic(Vec3::ZERO));
        let mut platform = PlatformAttachment::new();

        // Agent one meter off the rotation axis
        let agent = Vec3::new(1.0, 0.0, 0.0);
        platform.connect(Some(body));
        platform.update(&world, agent, 1.0, DT);
        platform.end_step();

        let angle = 0.02;
        world.set_body_pose(body, Pose::new(Vec3::ZERO, Quat::from_rotation_y(angle)));
        platform.connect(Some(body));
        platform.update(&world, agent, 1.0, DT);

        // Tangential speed of a point at radius 1 is angle / dt
        let speed = platform.velocity().length();
        assert!((speed - angle / DT).abs() < 1e-2, "tangential speed {}", speed);
        assert!(platform.velocity().z < 0.0);
    }

    #[test]
    fn test_light_body_ignored() {
        let mut world = StaticWorld::new();
        let body = world.add_body(BodyState::dynamic(Vec3::ZERO, Quat::IDENTITY, 0.5));
        let mut platform = PlatformAttachment::new();

        for x in [0.0, 0.1] {
            world.set_body_pose(body, Pose::from_position(Vec3::new(x, 0.0, 0.0)));
            platform.connect(Some(body));
            platform.update(&world, Vec3::Y, 1.0, DT);
            assert_eq!(platform.velocity(), Vec3::ZERO);
            platform.end_step();
        }
    }

    #[test]
    fn test_vanished_body_detaches() {
        let mut world = StaticWorld::new();
        let body = world.add_body(BodyState::kinematic(Vec3::ZERO));
        world.remove_body(body);

        let mut platform = PlatformAttachment::new();
        platform.connect(Some(body));
        platform.update(&world, Vec3::Y, 1.0, DT);
        assert_eq!(platform.connected(), None);
    }
}
