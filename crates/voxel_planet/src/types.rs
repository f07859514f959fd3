//! Core mesh and bounds types shared by extraction, chunks and the octree.

use glam::{Vec2, Vec3};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: Vec3,
  pub max: Vec3,
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::INFINITY),
      max: Vec3::splat(f32::NEG_INFINITY),
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Create a cube AABB from its center and edge length.
  pub fn from_center_size(center: Vec3, size: f32) -> Self {
    let half = Vec3::splat(size * 0.5);
    Self {
      min: center - half,
      max: center + half,
    }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }

  pub fn contains(&self, point: Vec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Half-open cell range `[min, max)` restricting surface extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractionBounds {
  pub min: [usize; 3],
  pub max: [usize; 3],
}

impl ExtractionBounds {
  pub fn new(min: [usize; 3], max: [usize; 3]) -> Self {
    Self { min, max }
  }

  /// Same range on every axis.
  pub fn uniform(min: usize, max: usize) -> Self {
    Self {
      min: [min; 3],
      max: [max; 3],
    }
  }

  /// Whole lattice of `size` samples minus a 1-cell margin.
  ///
  /// A lattice of `N` samples has `N - 1` cells; cell 0 is left out.
  pub fn full(size: usize) -> Self {
    Self::uniform(1, size.saturating_sub(1))
  }

  /// Clamp to the cells that exist in a lattice of `size` samples.
  pub fn clamped(self, size: usize) -> Self {
    let cells = size.saturating_sub(1);
    Self {
      min: self.min.map(|v| v.min(cells)),
      max: self.max.map(|v| v.min(cells)),
    }
  }

  #[inline]
  pub fn contains(&self, cell: [usize; 3]) -> bool {
    (0..3).all(|i| cell[i] >= self.min[i] && cell[i] < self.max[i])
  }

  pub fn is_empty(&self) -> bool {
    (0..3).any(|i| self.min[i] >= self.max[i])
  }
}

/// Triangle mesh produced by surface extraction.
///
/// `normals` (and `uvs`, when present) run parallel to `vertices`.
/// `indices` holds 3 entries per triangle, each `< vertices.len()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
  pub vertices: Vec<Vec3>,
  pub indices: Vec<u32>,
  pub normals: Vec<Vec3>,
  /// Empty until texture coordinates are derived.
  pub uvs: Vec<Vec2>,
}

impl Mesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.indices.clear();
    self.normals.clear();
    self.uvs.clear();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Iterate triangles as index triples.
  pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
    self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
  }

  /// Bounding box of all vertices (empty AABB for an empty mesh).
  pub fn bounds(&self) -> MinMaxAABB {
    let mut bounds = MinMaxAABB::empty();
    for &v in &self.vertices {
      bounds.encapsulate(v);
    }
    bounds
  }

  /// Check the buffer-length and index-range invariants.
  pub fn is_consistent(&self) -> bool {
    let vertex_count = self.vertices.len();
    self.normals.len() == vertex_count
      && (self.uvs.is_empty() || self.uvs.len() == vertex_count)
      && self.indices.len() % 3 == 0
      && self.indices.iter().all(|&i| (i as usize) < vertex_count)
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
