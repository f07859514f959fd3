//! Statistics from one LOD update.

/// Counters collected by [`OctreeTree::update_lod`](super::OctreeTree::update_lod).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefinementStats {
  /// Nodes whose viewer distance was re-evaluated.
  pub nodes_visited: usize,
  /// Leaves split into 8 children.
  pub subdivisions_performed: usize,
  /// Internal nodes collapsed back into a leaf.
  pub merges_performed: usize,
  /// Chunks created for newly active leaves.
  pub chunks_created: usize,
  /// Chunks dropped because their leaf was subdivided or merged away.
  pub chunks_dropped: usize,
}

impl RefinementStats {
  /// Total number of structural transitions performed.
  #[inline]
  pub fn total_transitions(&self) -> usize {
    self.subdivisions_performed + self.merges_performed
  }

  /// True when the update left the tree shape unchanged.
  #[inline]
  pub fn is_structurally_stable(&self) -> bool {
    self.total_transitions() == 0
  }
}
