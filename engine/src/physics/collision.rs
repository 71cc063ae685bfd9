//! Collision detection module
//!
//! A small headless collision world: axis-aligned box colliders, optionally
//! owned by a movable body and queried with the slab method, plus static
//! sphere colliders for planets. It implements
//! [`PhysicsQueries`] and produces sphere contacts so the locomotion
//! controller can be driven without an external engine (tests, the demo
//! binary). Collider boxes follow their body's translation only.
//!
//! # Ray-AABB Intersection
//!
//! The slab method finds the intersection by computing entry and exit times
//! for each axis.
//!
//! # Example
//!
//! ```ignore
//! use planetwalk_engine::physics::{StaticWorld, SphereBody, SurfaceTags};
//! use glam::Vec3;
//!
//! let mut world = StaticWorld::new();
//! world.add_box(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0));
//!
//! let mut ball = SphereBody::new(Vec3::new(0.0, 0.4, 0.0), 0.5, 1.0);
//! let contacts = ball.resolve_contacts(&world);
//! ```

use glam::Vec3;

use super::query::{
    AgentBody, BodyHandle, BodyState, Contact, LayerMask, PhysicsQueries, RaycastHit, SurfaceTags,
};
use super::types::Pose;

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(ray_origin: Vec3, ray_dir: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Option<f32> {
    // Near-zero directions get huge inverse values so their slab never limits
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;
    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Ray-sphere intersection.
///
/// Returns the distance to the first surface crossing in front of the
/// origin (the exit point when starting inside).
pub fn ray_sphere_intersect(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = ray_origin - center;
    let b = offset.dot(ray_dir);
    let c = offset.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Computes the outward normal of the AABB face nearest to `point`.
///
/// # Arguments
///
/// * `point` - Point on (or inside) the AABB
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.x && abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Axis-aligned box collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    /// Minimum corner (world space, or body-local when `body` is set)
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
    /// Gameplay tags
    pub tags: SurfaceTags,
    /// Collision layer (0..32)
    pub layer: u8,
    /// Owning body; the box follows its position
    pub body: Option<BodyHandle>,
}

/// Static sphere collider (planets, boulders).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    /// Center in world space
    pub center: Vec3,
    /// Radius
    pub radius: f32,
    /// Gameplay tags
    pub tags: SurfaceTags,
    /// Collision layer (0..32)
    pub layer: u8,
}

/// Overlap between the agent sphere and a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Contact as reported to the controller
    pub contact: Contact,
    /// Overlap depth along the normal
    pub depth: f32,
}

/// Headless collision world of box colliders and movable bodies.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    colliders: Vec<BoxCollider>,
    spheres: Vec<SphereCollider>,
    bodies: Vec<Option<BodyState>>,
}

impl StaticWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an untagged static box on layer 0.
    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> usize {
        self.add_tagged_box(min, max, SurfaceTags::NONE, 0)
    }

    /// Add a static box with tags and layer.
    pub fn add_tagged_box(&mut self, min: Vec3, max: Vec3, tags: SurfaceTags, layer: u8) -> usize {
        self.colliders.push(BoxCollider {
            min: min.min(max),
            max: min.max(max),
            tags,
            layer,
            body: None,
        });
        self.colliders.len() - 1
    }

    /// Add a static sphere collider.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, tags: SurfaceTags, layer: u8) -> usize {
        self.spheres.push(SphereCollider {
            center,
            radius: radius.max(0.0),
            tags,
            layer,
        });
        self.spheres.len() - 1
    }

    /// Add a body and return its handle.
    pub fn add_body(&mut self, state: BodyState) -> BodyHandle {
        self.bodies.push(Some(state));
        BodyHandle((self.bodies.len() - 1) as u32)
    }

    /// Attach a box (in body-local coordinates) to `body`.
    pub fn attach_box(&mut self, body: BodyHandle, local_min: Vec3, local_max: Vec3, tags: SurfaceTags) -> usize {
        self.colliders.push(BoxCollider {
            min: local_min.min(local_max),
            max: local_min.max(local_max),
            tags,
            layer: 0,
            body: Some(body),
        });
        self.colliders.len() - 1
    }

    /// Move a body. Returns `false` for stale handles.
    pub fn set_body_pose(&mut self, handle: BodyHandle, pose: Pose) -> bool {
        match self.bodies.get_mut(handle.0 as usize) {
            Some(Some(state)) => {
                state.pose = pose;
                true
            }
            _ => false,
        }
    }

    /// Remove a body and every collider attached to it.
    pub fn remove_body(&mut self, handle: BodyHandle) {
        if let Some(slot) = self.bodies.get_mut(handle.0 as usize) {
            *slot = None;
        }
        self.colliders.retain(|c| c.body != Some(handle));
    }

    /// World-space bounds of a collider, `None` if its body is gone.
    fn world_bounds(&self, collider: &BoxCollider) -> Option<(Vec3, Vec3)> {
        match collider.body {
            None => Some((collider.min, collider.max)),
            Some(handle) => {
                let state = self.body(handle)?;
                let offset = state.pose.position;
                Some((collider.min + offset, collider.max + offset))
            }
        }
    }

    /// Every collider the sphere overlaps, with push-out normals.
    pub fn sphere_penetrations(&self, center: Vec3, radius: f32) -> Vec<Penetration> {
        let mut result = Vec::new();
        for collider in &self.colliders {
            let Some((min, max)) = self.world_bounds(collider) else {
                continue;
            };
            let closest = center.clamp(min, max);
            let offset = center - closest;
            let distance = offset.length();
            let (normal, depth) = if distance > 1e-6 {
                if distance >= radius {
                    continue;
                }
                (offset / distance, radius - distance)
            } else {
                // Center inside the box: leave through the nearest face
                let normal = aabb_surface_normal(center, min, max);
                let face_distance = ((max - center) * normal.max(Vec3::ZERO)
                    + (center - min) * (-normal).max(Vec3::ZERO))
                .element_sum();
                (normal, radius + face_distance)
            };
            result.push(Penetration {
                contact: Contact {
                    normal,
                    tags: collider.tags,
                    body: collider.body,
                },
                depth,
            });
        }
        for sphere in &self.spheres {
            let offset = center - sphere.center;
            let distance = offset.length();
            let reach = radius + sphere.radius;
            if distance >= reach {
                continue;
            }
            let normal = if distance > 1e-6 { offset / distance } else { Vec3::Y };
            result.push(Penetration {
                contact: Contact::new(normal).with_tags(sphere.tags),
                depth: reach - distance,
            });
        }
        result
    }
}

impl PhysicsQueries for StaticWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RaycastHit> {
        let mut closest: Option<RaycastHit> = None;
        let mut closest_dist = max_distance;

        for collider in &self.colliders {
            if !mask.contains_layer(collider.layer) {
                continue;
            }
            let Some((min, max)) = self.world_bounds(collider) else {
                continue;
            };
            // Rays starting inside a collider ignore it
            if origin.cmpge(min).all() && origin.cmple(max).all() {
                continue;
            }
            if let Some(t) = ray_aabb_intersect(origin, direction, min, max) {
                if t >= 0.0 && t <= closest_dist {
                    let hit_position = origin + direction * t;
                    closest = Some(RaycastHit {
                        distance: t,
                        normal: aabb_surface_normal(hit_position, min, max),
                        tags: collider.tags,
                        body: collider.body,
                    });
                    closest_dist = t;
                }
            }
        }

        for sphere in &self.spheres {
            if !mask.contains_layer(sphere.layer) {
                continue;
            }
            if origin.distance_squared(sphere.center) <= sphere.radius * sphere.radius {
                continue;
            }
            if let Some(t) = ray_sphere_intersect(origin, direction, sphere.center, sphere.radius) {
                if t <= closest_dist {
                    let hit_position = origin + direction * t;
                    closest = Some(RaycastHit {
                        distance: t,
                        normal: (hit_position - sphere.center).normalize_or_zero(),
                        tags: sphere.tags,
                        body: None,
                    });
                    closest_dist = t;
                }
            }
        }

        closest
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        let boxes = self.colliders.iter().any(|collider| {
            mask.contains_layer(collider.layer)
                && self
                    .world_bounds(collider)
                    .is_some_and(|(min, max)| center.distance_squared(center.clamp(min, max)) <= radius * radius)
        });
        boxes
            || self.spheres.iter().any(|sphere| {
                mask.contains_layer(sphere.layer) && center.distance(sphere.center) <= radius + sphere.radius
            })
    }

    fn body(&self, handle: BodyHandle) -> Option<BodyState> {
        self.bodies.get(handle.0 as usize).copied().flatten()
    }
}

/// Sphere-shaped rigid body proxy (translation only).
#[derive(Debug, Clone, PartialEq)]
pub struct SphereBody {
    /// Center in world space
    pub position: Vec3,
    /// Linear velocity
    pub velocity: Vec3,
    /// Collision radius
    pub radius: f32,
    /// Mass in kg
    pub mass: f32,
    sleeping: bool,
}

impl SphereBody {
    /// Create a body at rest.
    pub fn new(position: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            radius,
            mass,
            sleeping: false,
        }
    }

    /// Force the sleeping flag (normally owned by the collision engine).
    pub fn set_sleeping(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
    }

    /// Push the body out of every overlapping collider, remove velocity
    /// heading into the surfaces, and return the contacts for this step.
    pub fn resolve_contacts(&mut self, world: &StaticWorld) -> Vec<Contact> {
        let penetrations = world.sphere_penetrations(self.position, self.radius);
        let mut contacts = Vec::with_capacity(penetrations.len());
        for p in penetrations {
            let normal = p.contact.normal;
            self.position += normal * p.depth;
            let into_surface = self.velocity.dot(normal);
            if into_surface < 0.0 {
                self.velocity -= normal * into_surface;
            }
            contacts.push(p.contact);
        }
        contacts
    }

    /// Advance the position by one step of the current velocity.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

impl AgentBody for SphereBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn is_sleeping(&self) -> bool {
        self.sleeping
    }
}
