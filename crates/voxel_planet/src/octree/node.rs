//! OctreeNode - one arena slot of the LOD tree.
//!
//! Relationships are arena indices, never references, so subdividing and
//! merging can grow the arena without invalidating anything.
//!
//! ```text
//! Vacant ──(subdivide reuses slot)──► Leaf { chunk: None }
//!                                      │   ▲
//!                    activity refresh  ▼   │ merge
//!                               Leaf { chunk: Some }
//!                                      │
//!                            subdivide ▼
//!                         Internal { children: [8] }
//! ```

use glam::DVec3;

use super::bounds::DAabb3;
use super::OctreeKey;
use crate::chunk::Chunk;

/// Shape of a node. Only leaves can own a chunk.
#[derive(Debug)]
pub enum NodeKind {
  Leaf { chunk: Option<Chunk> },
  Internal { children: [usize; 8] },
  /// Cleared by a merge; waiting on the free list.
  Vacant,
}

#[derive(Debug)]
pub struct OctreeNode {
  pub(crate) key: OctreeKey,
  pub(crate) center: DVec3,
  pub(crate) size: f64,
  pub(crate) parent: Option<usize>,
  pub(crate) kind: NodeKind,
  pub(crate) active: bool,
  pub(crate) distance_from_viewer: f64,
}

impl OctreeNode {
  pub(crate) fn new_leaf(key: OctreeKey, center: DVec3, size: f64, parent: Option<usize>) -> Self {
    Self {
      key,
      center,
      size,
      parent,
      kind: NodeKind::Leaf { chunk: None },
      active: false,
      distance_from_viewer: f64::INFINITY,
    }
  }

  pub(crate) fn vacant() -> Self {
    Self {
      key: OctreeKey::new(0, glam::IVec3::ZERO),
      center: DVec3::ZERO,
      size: 0.0,
      parent: None,
      kind: NodeKind::Vacant,
      active: false,
      distance_from_viewer: f64::INFINITY,
    }
  }

  #[inline]
  pub fn key(&self) -> OctreeKey {
    self.key
  }

  #[inline]
  pub fn center(&self) -> DVec3 {
    self.center
  }

  /// Edge length.
  #[inline]
  pub fn size(&self) -> f64 {
    self.size
  }

  #[inline]
  pub fn parent(&self) -> Option<usize> {
    self.parent
  }

  #[inline]
  pub fn kind(&self) -> &NodeKind {
    &self.kind
  }

  /// Child indices in octant order, if subdivided.
  #[inline]
  pub fn children(&self) -> Option<&[usize; 8]> {
    match &self.kind {
      NodeKind::Internal { children } => Some(children),
      _ => None,
    }
  }

  #[inline]
  pub fn has_children(&self) -> bool {
    matches!(self.kind, NodeKind::Internal { .. })
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, NodeKind::Leaf { .. })
  }

  #[inline]
  pub fn is_vacant(&self) -> bool {
    matches!(self.kind, NodeKind::Vacant)
  }

  #[inline]
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Distance to the viewer at the last LOD update.
  #[inline]
  pub fn distance_from_viewer(&self) -> f64 {
    self.distance_from_viewer
  }

  pub fn chunk(&self) -> Option<&Chunk> {
    match &self.kind {
      NodeKind::Leaf { chunk } => chunk.as_ref(),
      _ => None,
    }
  }

  pub fn chunk_mut(&mut self) -> Option<&mut Chunk> {
    match &mut self.kind {
      NodeKind::Leaf { chunk } => chunk.as_mut(),
      _ => None,
    }
  }

  /// World-space extent, for external visibility tests.
  pub fn bounds(&self) -> DAabb3 {
    DAabb3::from_center_size(self.center, self.size)
  }
}
