//! Double-precision bounding boxes for octree nodes.
//!
//! Node centres and sizes live in f64 so very large planets keep precision
//! at the root; meshes drop to f32 only inside a chunk.

use glam::DVec3;

use crate::types::MinMaxAABB;

/// Double-precision axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb3 {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl DAabb3 {
  pub fn new(min: DVec3, max: DVec3) -> Self {
    debug_assert!(min.cmple(max).all(), "AABB min must be <= max on all axes");
    Self { min, max }
  }

  /// Cube with the given centre and edge length (an octree node's extent).
  pub fn from_center_size(center: DVec3, size: f64) -> Self {
    let half = DVec3::splat(size * 0.5);
    Self {
      min: center - half,
      max: center + half,
    }
  }

  /// Two AABBs overlap if they share any interior or boundary points.
  #[inline]
  pub fn overlaps(&self, other: &DAabb3) -> bool {
    self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
  }

  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  /// Distance from `point` to the nearest point of the box (0 inside).
  #[inline]
  pub fn distance_to_point(&self, point: DVec3) -> f64 {
    point.distance(point.clamp(self.min, self.max))
  }

  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  #[inline]
  pub fn center(&self) -> DVec3 {
    (self.min + self.max) * 0.5
  }

  /// Single-precision copy for mesh-space consumers.
  pub fn to_f32(&self) -> MinMaxAABB {
    MinMaxAABB::new(self.min.as_vec3(), self.max.as_vec3())
  }
}
