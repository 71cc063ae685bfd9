//! Per-step contact accumulation.
//!
//! Contact callbacks may fire several times before a step consumes them, so
//! normals are summed here and only normalized when the step reads them.

use glam::Vec3;

use crate::physics::{Contact, SurfaceTags};

/// Upward alignment above which a non-ground contact still counts as steep.
/// Anything lower is a ceiling.
pub const STEEP_MIN_UP_DOT: f32 = -0.01;

/// Dot thresholds used to classify a contact against the current up axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactThresholds {
    pub min_ground_dot: f32,
    pub min_stairs_dot: f32,
    pub min_climb_dot: f32,
}

impl ContactThresholds {
    /// Ground threshold for a surface with `tags` (stairs are more lenient).
    pub(crate) fn min_dot_for(&self, tags: SurfaceTags) -> f32 {
        if tags.contains(SurfaceTags::STAIRS) {
            self.min_stairs_dot
        } else {
            self.min_ground_dot
        }
    }
}

/// Which categories a single contact fell into.
///
/// Ground excludes the others; steep and climb are tested independently,
/// so a near-vertical climbable wall reports both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactClass {
    pub ground: bool,
    pub steep: bool,
    pub climb: bool,
}

/// Scratch state summed over one step's contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactState {
    pub ground_count: u32,
    pub steep_count: u32,
    pub climb_count: u32,
    pub contact_normal: Vec3,
    pub steep_normal: Vec3,
    pub climb_normal: Vec3,
    /// Most recent single climb normal; survives [`clear`](Self::clear).
    pub last_climb_normal: Vec3,
}

impl Default for ContactState {
    fn default() -> Self {
        Self {
            ground_count: 0,
            steep_count: 0,
            climb_count: 0,
            contact_normal: Vec3::ZERO,
            steep_normal: Vec3::ZERO,
            climb_normal: Vec3::ZERO,
            last_climb_normal: Vec3::ZERO,
        }
    }
}

impl ContactState {
    /// Classify one contact against `up_axis` and add it to the sums.
    pub fn accumulate(&mut self, contact: &Contact, up_axis: Vec3, thresholds: &ContactThresholds) -> ContactClass {
        let normal = contact.normal;
        let up_dot = up_axis.dot(normal);
        let mut class = ContactClass::default();

        if up_dot >= thresholds.min_dot_for(contact.tags) {
            self.ground_count += 1;
            self.contact_normal += normal;
            class.ground = true;
            return class;
        }

        if up_dot > STEEP_MIN_UP_DOT {
            self.steep_count += 1;
            self.steep_normal += normal;
            class.steep = true;
        }
        if up_dot >= thresholds.min_climb_dot && contact.tags.contains(SurfaceTags::CLIMBABLE) {
            self.climb_count += 1;
            self.climb_normal += normal;
            self.last_climb_normal = normal;
            class.climb = true;
        }
        class
    }

    pub fn on_ground(&self) -> bool {
        self.ground_count > 0
    }

    pub fn on_steep(&self) -> bool {
        self.steep_count > 0
    }

    pub fn climbing(&self) -> bool {
        self.climb_count > 0
    }

    /// Adopt the climb normal as ground.
    ///
    /// Several climb contacts that merge into something walkable mean the
    /// agent is wedged in a crevasse; the last single wall normal is used
    /// then so it keeps climbing instead of standing on the gap.
    pub fn merge_climb(&mut self, up_axis: Vec3, min_ground_dot: f32) -> bool {
        if !self.climbing() {
            return false;
        }
        if self.climb_count > 1 {
            self.climb_normal = self.climb_normal.normalize_or_zero();
            if up_axis.dot(self.climb_normal) >= min_ground_dot {
                self.climb_normal = self.last_climb_normal;
            }
        }
        self.ground_count = 1;
        self.contact_normal = self.climb_normal;
        true
    }

    /// Treat a set of steep contacts that together face up enough as ground.
    pub fn merge_steep(&mut self, up_axis: Vec3, min_ground_dot: f32) -> bool {
        if self.steep_count <= 1 {
            return false;
        }
        self.steep_normal = self.steep_normal.normalize_or_zero();
        if up_axis.dot(self.steep_normal) >= min_ground_dot {
            self.steep_count = 0;
            self.ground_count = 1;
            self.contact_normal = self.steep_normal;
            true
        } else {
            false
        }
    }

    /// Reset counters and sums for the next step.
    pub fn clear(&mut self) {
        *self = Self {
            last_climb_normal: self.last_climb_normal,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> ContactThresholds {
        ContactThresholds {
            min_ground_dot: 25f32.to_radians().cos(),
            min_stairs_dot: 50f32.to_radians().cos(),
            min_climb_dot: 140f32.to_radians().cos(),
        }
    }

    #[test]
    fn test_flat_ground() {
        let mut state = ContactState::default();
        let class = state.accumulate(&Contact::new(Vec3::Y), Vec3::Y, &thresholds());
        assert!(class.ground && !class.steep && !class.climb);
        assert_eq!(state.ground_count, 1);
        assert_eq!(state.contact_normal, Vec3::Y);
    }

    #[test]
    fn test_stairs_threshold() {
        // 40 degree slope: too steep for ground, fine for stairs
        let normal = Vec3::new(40f32.to_radians().sin(), 40f32.to_radians().cos(), 0.0);
        let mut state = ContactState::default();
        assert!(!state.accumulate(&Contact::new(normal), Vec3::Y, &thresholds()).ground);
        let stairs = Contact::new(normal).with_tags(SurfaceTags::STAIRS);
        assert!(state.accumulate(&stairs, Vec3::Y, &thresholds()).ground);
    }

    #[test]
    fn test_climbable_wall_is_steep_and_climb() {
        let mut state = ContactState::default();
        let wall = Contact::new(Vec3::X).with_tags(SurfaceTags::CLIMBABLE);
        let class = state.accumulate(&wall, Vec3::Y, &thresholds());
        assert!(class.steep && class.climb);
        assert_eq!(state.steep_count, 1);
        assert_eq!(state.climb_count, 1);
        assert_eq!(state.last_climb_normal, Vec3::X);
    }

    #[test]
    fn test_ceiling_is_nothing() {
        let mut state = ContactState::default();
        let class = state.accumulate(&Contact::new(-Vec3::Y), Vec3::Y, &thresholds());
        assert_eq!(class, ContactClass::default());
    }

    #[test]
    fn test_overhang_still_climbable() {
        // 120 degrees from up: ceiling for steep, inside the 140 degree climb cone
        let angle = 120f32.to_radians();
        let normal = Vec3::new(angle.sin(), angle.cos(), 0.0);
        let mut state = ContactState::default();
        let class = state.accumulate(&Contact::new(normal).with_tags(SurfaceTags::CLIMBABLE), Vec3::Y, &thresholds());
        assert!(!class.steep);
        assert!(class.climb);
    }

    #[test]
    fn test_merge_steep_crease() {
        // Two 60 degree slopes forming a V
        let a = Vec3::new(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        let b = Vec3::new(-a.x, a.y, 0.0);
        let mut state = ContactState::default();
        state.accumulate(&Contact::new(a), Vec3::Y, &thresholds());
        state.accumulate(&Contact::new(b), Vec3::Y, &thresholds());
        assert_eq!(state.steep_count, 2);

        assert!(state.merge_steep(Vec3::Y, thresholds().min_ground_dot));
        assert_eq!(state.steep_count, 0);
        assert_eq!(state.ground_count, 1);
        assert!((state.contact_normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_merge_single_steep_fails() {
        let mut state = ContactState::default();
        state.accumulate(&Contact::new(Vec3::X), Vec3::Y, &thresholds());
        assert!(!state.merge_steep(Vec3::Y, thresholds().min_ground_dot));
        assert_eq!(state.steep_count, 1);
    }

    #[test]
    fn test_merge_climb_crevasse_uses_last_wall() {
        let mut state = ContactState::default();
        let left = Contact::new(Vec3::new(0.8, 0.6, 0.0)).with_tags(SurfaceTags::CLIMBABLE);
        let right = Contact::new(Vec3::new(-0.8, 0.6, 0.0)).with_tags(SurfaceTags::CLIMBABLE);
        state.accumulate(&left, Vec3::Y, &thresholds());
        state.accumulate(&right, Vec3::Y, &thresholds());

        assert!(state.merge_climb(Vec3::Y, thresholds().min_ground_dot));
        assert_eq!(state.contact_normal, right.normal);
        assert_eq!(state.ground_count, 1);
    }

    #[test]
    fn test_clear_keeps_last_climb_normal() {
        let mut state = ContactState::default();
        state.accumulate(&Contact::new(Vec3::Z).with_tags(SurfaceTags::CLIMBABLE), Vec3::Y, &thresholds());
        state.clear();
        assert_eq!(state.climb_count, 0);
        assert_eq!(state.steep_normal, Vec3::ZERO);
        assert_eq!(state.last_climb_normal, Vec3::Z);
    }
}
