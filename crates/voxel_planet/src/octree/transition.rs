//! TransitionGroup - a recorded octree state change.
//!
//! `update_lod` records every decision first and applies them afterwards, so
//! no arena index is invalidated while the tree is being walked. A group is
//! either a subdivide (1 parent → 8 children) or a merge (8 children → 1
//! parent). Applying a group registers `nodes_to_add` in the tree's key map
//! and unregisters `nodes_to_remove`; a group whose lists no longer match the
//! node under `group_key` is rejected.

use smallvec::SmallVec;

use super::OctreeKey;

/// Type of octree transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionType {
  /// 1 parent → 8 children (finer detail)
  Subdivide,
  /// 8 children → 1 parent (coarser detail)
  Merge,
}

/// Recorded octree state change.
///
/// Group key is always the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionGroup {
  pub transition_type: TransitionType,

  /// Key: the parent node (for both subdivide and merge).
  pub group_key: OctreeKey,

  /// Keys that become leaves.
  /// - Subdivide: 8 children
  /// - Merge: 1 parent
  pub nodes_to_add: SmallVec<[OctreeKey; 8]>,

  /// Keys that stop being leaves.
  /// - Subdivide: 1 parent
  /// - Merge: 8 children
  pub nodes_to_remove: SmallVec<[OctreeKey; 8]>,
}

impl TransitionGroup {
  /// Create a subdivide transition: parent → 8 children.
  ///
  /// Returns None at level 0.
  pub fn new_subdivide(parent: OctreeKey) -> Option<Self> {
    let children = parent.children()?;
    Some(Self {
      transition_type: TransitionType::Subdivide,
      group_key: parent,
      nodes_to_add: SmallVec::from_buf(children),
      nodes_to_remove: smallvec::smallvec![parent],
    })
  }

  /// Create a merge transition: 8 children → parent.
  ///
  /// Returns None at level 0 (such a node cannot have children).
  pub fn new_merge(parent: OctreeKey) -> Option<Self> {
    let children = parent.children()?;
    Some(Self {
      transition_type: TransitionType::Merge,
      group_key: parent,
      nodes_to_add: smallvec::smallvec![parent],
      nodes_to_remove: SmallVec::from_buf(children),
    })
  }

  #[inline]
  pub fn is_subdivide(&self) -> bool {
    self.transition_type == TransitionType::Subdivide
  }
}

#[cfg(test)]
#[path = "transition_test.rs"]
mod transition_test;
