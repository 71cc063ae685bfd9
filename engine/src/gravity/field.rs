//! Gravity Field
//!
//! Registry of active gravity sources owned by the simulation world. The net
//! gravity at a point is the plain vector sum of every source's contribution;
//! there is no caching since fields hold few sources and each is cheap.
//!
//! # Usage
//!
//! ```rust,ignore
//! use planetwalk_engine::gravity::{GravityField, GravitySource, SphereSource};
//! use glam::Vec3;
//!
//! let mut field = GravityField::new();
//! let planet = field.register(GravitySource::sphere(Vec3::ZERO, SphereSource::new(9.81, 50.0, 80.0)));
//!
//! let (gravity, up) = field.gravity_and_up(Vec3::new(0.0, 51.0, 0.0));
//!
//! field.unregister(planet).expect("planet was registered");
//! ```

use glam::Vec3;
use tracing::{debug, info};

use super::source::GravitySource;
use crate::error::GravityFieldError;
use crate::physics::Pose;

/// Handle to a registered source. Ids are never reused within a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    /// Raw numeric value (stable for the lifetime of the field).
    pub fn index(self) -> u32 {
        self.0
    }
}

static_assertions::assert_eq_size!(SourceId, u32);

/// Set of active gravity sources.
///
/// Registration takes the source by value and hands back a fresh id, so the
/// same source can never be registered twice. Unregistering an unknown id is
/// reported as [`GravityFieldError::UnknownSource`].
#[derive(Debug, Clone, Default)]
pub struct GravityField {
    sources: Vec<(SourceId, GravitySource)>,
    next_id: u32,
}

impl GravityField {
    /// Create an empty field (zero gravity everywhere).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source and return its handle.
    pub fn register(&mut self, source: GravitySource) -> SourceId {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        let source = source.sanitized();
        info!(
            id = id.0,
            kind = source.kind_name(),
            position = ?source.pose.position,
            "registered gravity source"
        );
        self.sources.push((id, source));
        id
    }

    /// Remove a source, returning it.
    pub fn unregister(&mut self, id: SourceId) -> Result<GravitySource, GravityFieldError> {
        let index = self
            .sources
            .iter()
            .position(|(sid, _)| *sid == id)
            .ok_or(GravityFieldError::UnknownSource(id))?;
        let (_, source) = self.sources.swap_remove(index);
        info!(id = id.0, kind = source.kind_name(), "unregistered gravity source");
        Ok(source)
    }

    /// Whether `id` is currently registered.
    pub fn contains(&self, id: SourceId) -> bool {
        self.sources.iter().any(|(sid, _)| *sid == id)
    }

    /// Look up a registered source.
    pub fn get(&self, id: SourceId) -> Option<&GravitySource> {
        self.sources.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Move a registered source (e.g. an emitter attached to a moving body).
    pub fn set_pose(&mut self, id: SourceId, pose: Pose) -> Result<(), GravityFieldError> {
        let (_, source) = self
            .sources
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .ok_or(GravityFieldError::UnknownSource(id))?;
        source.pose = pose;
        debug!(id = id.0, position = ?pose.position, "moved gravity source");
        Ok(())
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no sources are registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Iterate over registered sources in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &GravitySource)> {
        self.sources.iter().map(|(id, s)| (*id, s))
    }

    /// Net gravity at `point`.
    pub fn gravity(&self, point: Vec3) -> Vec3 {
        self.sources
            .iter()
            .fold(Vec3::ZERO, |sum, (_, source)| sum + source.gravity_at(point))
    }

    /// Unit vector opposite the net gravity at `point`.
    ///
    /// Returns [`Vec3::ZERO`] where the net gravity vanishes; callers must
    /// pick their own fallback there.
    pub fn up_axis(&self, point: Vec3) -> Vec3 {
        -self.gravity(point).normalize_or_zero()
    }

    /// Net gravity and up axis in one evaluation.
    pub fn gravity_and_up(&self, point: Vec3) -> (Vec3, Vec3) {
        let gravity = self.gravity(point);
        (gravity, -gravity.normalize_or_zero())
    }
}
