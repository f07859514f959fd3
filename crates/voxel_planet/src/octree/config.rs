//! OctreeSettings - LOD thresholds and node coordinate math.
//!
//! # LOD Convention
//!
//! Level 0 = finest detail (smallest nodes), the root sits at `max_depth`.
//!
//! ```text
//! node_size(level) = root_size / 2^(max_depth - level)
//! min_chunk_size   = node_size(0)
//!
//! required_size(d) = clamp(min_chunk_size * 2^(d / subdivision_distance),
//!                          min_chunk_size, root_size)
//!
//! leaf subdivides  when  size > required_size(d)          (and level > 0)
//! node merges      when  size * merge_distance_multiplier <= required(d)
//! ```
//!
//! The merge test uses the required size without the upper clamp, so nodes
//! near the root can still collapse once the viewer is far enough away.
//! Between the two thresholds a node keeps its current shape.

use glam::{DVec3, IVec3};
use thiserror::Error;

use super::OctreeKey;
use crate::constants::DEFAULT_CHUNK_RESOLUTION;

/// Deepest tree supported; keeps grid coordinates inside i32.
pub const MAX_SUPPORTED_DEPTH: u32 = 30;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
  #[error("root_size must be positive and finite, got {0}")]
  InvalidRootSize(f64),
  #[error("subdivision_distance must be positive and finite, got {0}")]
  InvalidSubdivisionDistance(f64),
  #[error("merge_distance_multiplier must be greater than 1, got {0}")]
  InvalidMergeMultiplier(f64),
  #[error("chunk_resolution must be at least 1")]
  ZeroResolution,
  #[error("max_depth {0} exceeds the supported maximum of {MAX_SUPPORTED_DEPTH}")]
  DepthTooLarge(u32),
  #[error("update_interval must be non-negative and finite, got {0}")]
  InvalidUpdateInterval(f64),
  #[error("min_viewer_movement must be non-negative and finite, got {0}")]
  InvalidViewerMovement(f64),
}

/// Configuration for octree refinement and chunk generation.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeSettings {
  /// Number of subdivision levels below the root.
  pub max_depth: u32,

  /// Edge length of the root node in world units.
  pub root_size: f64,

  /// Distance over which the required node size doubles.
  pub subdivision_distance: f64,

  /// Merge hysteresis factor (> 1).
  pub merge_distance_multiplier: f64,

  /// Voxels per chunk axis (unpadded).
  pub chunk_resolution: u32,

  /// Minimum seconds between LOD updates when driven by a world tick.
  pub update_interval: f64,

  /// Minimum viewer travel before a ticked LOD update runs.
  pub min_viewer_movement: f64,
}

impl Default for OctreeSettings {
  fn default() -> Self {
    Self {
      max_depth: 6,
      root_size: 4000.0,
      subdivision_distance: 100.0,
      merge_distance_multiplier: 3.0,
      chunk_resolution: DEFAULT_CHUNK_RESOLUTION,
      update_interval: 0.1,
      min_viewer_movement: 10.0,
    }
  }
}

impl OctreeSettings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn with_root_size(mut self, root_size: f64) -> Self {
    self.root_size = root_size;
    self
  }

  pub fn with_subdivision_distance(mut self, distance: f64) -> Self {
    self.subdivision_distance = distance;
    self
  }

  pub fn with_merge_distance_multiplier(mut self, multiplier: f64) -> Self {
    self.merge_distance_multiplier = multiplier;
    self
  }

  pub fn with_chunk_resolution(mut self, resolution: u32) -> Self {
    self.chunk_resolution = resolution;
    self
  }

  pub fn with_update_interval(mut self, seconds: f64) -> Self {
    self.update_interval = seconds;
    self
  }

  pub fn with_min_viewer_movement(mut self, distance: f64) -> Self {
    self.min_viewer_movement = distance;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(self.root_size.is_finite() && self.root_size > 0.0) {
      return Err(ConfigError::InvalidRootSize(self.root_size));
    }
    if !(self.subdivision_distance.is_finite() && self.subdivision_distance > 0.0) {
      return Err(ConfigError::InvalidSubdivisionDistance(
        self.subdivision_distance,
      ));
    }
    if !(self.merge_distance_multiplier > 1.0) {
      return Err(ConfigError::InvalidMergeMultiplier(
        self.merge_distance_multiplier,
      ));
    }
    if self.chunk_resolution == 0 {
      return Err(ConfigError::ZeroResolution);
    }
    if self.max_depth > MAX_SUPPORTED_DEPTH {
      return Err(ConfigError::DepthTooLarge(self.max_depth));
    }
    if !(self.update_interval.is_finite() && self.update_interval >= 0.0) {
      return Err(ConfigError::InvalidUpdateInterval(self.update_interval));
    }
    if !(self.min_viewer_movement.is_finite() && self.min_viewer_movement >= 0.0) {
      return Err(ConfigError::InvalidViewerMovement(self.min_viewer_movement));
    }
    Ok(())
  }

  /// Edge length of nodes at `level`.
  #[inline]
  pub fn node_size(&self, level: i32) -> f64 {
    let steps = self.max_depth as i32 - level;
    self.root_size * 2.0_f64.powi(-steps)
  }

  /// Edge length of the finest (level 0) nodes.
  #[inline]
  pub fn min_chunk_size(&self) -> f64 {
    self.node_size(0)
  }

  /// Required size before the upper clamp.
  #[inline]
  fn unclamped_required_size(&self, distance: f64) -> f64 {
    let min = self.min_chunk_size();
    (min * (distance / self.subdivision_distance).exp2()).max(min)
  }

  /// Largest node size acceptable at `distance` from the viewer.
  #[inline]
  pub fn required_size(&self, distance: f64) -> f64 {
    self
      .unclamped_required_size(distance)
      .min(self.root_size)
  }

  /// Should a leaf of `size` at `level` split at this distance?
  #[inline]
  pub fn should_subdivide(&self, size: f64, level: i32, distance: f64) -> bool {
    level > 0 && size > self.required_size(distance)
  }

  /// Should an internal node of `size` collapse at this distance?
  #[inline]
  pub fn should_merge(&self, size: f64, distance: f64) -> bool {
    self.unclamped_required_size(distance) >= size * self.merge_distance_multiplier
  }

  /// World-space centre of `key` in a tree whose root is centred on `origin`.
  pub fn node_center(&self, origin: DVec3, key: &OctreeKey) -> DVec3 {
    let size = self.node_size(key.level);
    let root_min = origin - DVec3::splat(self.root_size * 0.5);
    root_min + (key.coords.as_dvec3() + DVec3::splat(0.5)) * size
  }

  /// Key of the level-`level` node containing `position`.
  pub fn key_at(&self, origin: DVec3, position: DVec3, level: i32) -> OctreeKey {
    let size = self.node_size(level);
    let root_min = origin - DVec3::splat(self.root_size * 0.5);
    let cell = ((position - root_min) / size).floor();
    OctreeKey::new(level, IVec3::new(cell.x as i32, cell.y as i32, cell.z as i32))
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
