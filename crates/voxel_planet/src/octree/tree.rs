//! OctreeTree - arena-backed LOD octree that owns every chunk.
//!
//! # Update Flow
//!
//! ```text
//! update_lod(viewer)
//!   │
//!   ├─ 1. BFS from roots: refresh distances, record TransitionGroups
//!   │       (no descent below a node that will merge)
//!   ├─ 2. apply subdivisions, then merges
//!   └─ 3. refresh activity: leaves active (chunk created on demand),
//!         internal nodes inactive
//! ```
//!
//! Merged slots go onto a free list and are reused by later subdivisions,
//! so live indices never move.

use std::collections::{HashMap, VecDeque};

use glam::{DVec3, Vec3};
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use super::bounds::DAabb3;
use super::config::{ConfigError, OctreeSettings};
use super::node::{NodeKind, OctreeNode};
use super::stats::RefinementStats;
use super::transition::{TransitionGroup, TransitionType};
use super::OctreeKey;
use crate::chunk::{Chunk, ChunkJob, ChunkMeshResult};
use crate::density::DensitySampler;

/// A generated chunk on an active leaf, as handed to a renderer.
#[derive(Clone, Copy, Debug)]
pub struct ActiveChunk<'a> {
  pub key: OctreeKey,
  pub node_index: usize,
  /// Chunk centre.
  pub position: Vec3,
  pub chunk: &'a Chunk,
}

/// A claimed chunk generation, routed back to its node by key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkTask {
  pub key: OctreeKey,
  pub job: ChunkJob,
}

#[derive(Debug)]
pub struct OctreeTree {
  settings: OctreeSettings,
  origin: DVec3,
  nodes: Vec<OctreeNode>,
  key_to_index: HashMap<OctreeKey, usize>,
  roots: Vec<usize>,
  free_slots: Vec<usize>,
  viewer: DVec3,
}

impl OctreeTree {
  /// Tree with its root centred on the world origin.
  pub fn new(settings: OctreeSettings) -> Result<Self, ConfigError> {
    Self::with_origin(settings, DVec3::ZERO)
  }

  /// Tree with its root centred on `origin`.
  pub fn with_origin(settings: OctreeSettings, origin: DVec3) -> Result<Self, ConfigError> {
    settings.validate()?;
    let mut tree = Self {
      settings,
      origin,
      nodes: Vec::new(),
      key_to_index: HashMap::new(),
      roots: Vec::new(),
      free_slots: Vec::new(),
      viewer: origin,
    };
    tree.initialize();
    Ok(tree)
  }

  /// Drop every node and chunk and seed a single active root.
  pub fn initialize(&mut self) {
    self.nodes.clear();
    self.key_to_index.clear();
    self.roots.clear();
    self.free_slots.clear();

    let key = OctreeKey::root(self.settings.max_depth);
    let root = OctreeNode::new_leaf(key, self.origin, self.settings.root_size, None);
    let index = self.allocate(root);
    self.key_to_index.insert(key, index);
    self.roots.push(index);
    self.refresh_activity();

    info!(
      root_size = self.settings.root_size,
      max_depth = self.settings.max_depth,
      resolution = self.settings.chunk_resolution,
      "octree initialized"
    );
  }

  /// Replace the settings and re-seed the tree.
  pub fn reinitialize(&mut self, settings: OctreeSettings) -> Result<(), ConfigError> {
    settings.validate()?;
    self.settings = settings;
    self.initialize();
    Ok(())
  }

  #[inline]
  pub fn settings(&self) -> &OctreeSettings {
    &self.settings
  }

  /// Centre of the root node.
  #[inline]
  pub fn origin(&self) -> DVec3 {
    self.origin
  }

  /// Viewer position of the last LOD update.
  #[inline]
  pub fn viewer(&self) -> DVec3 {
    self.viewer
  }

  #[inline]
  pub fn roots(&self) -> &[usize] {
    &self.roots
  }

  /// Node at an arena index (vacant slots included).
  #[inline]
  pub fn node(&self, index: usize) -> Option<&OctreeNode> {
    self.nodes.get(index)
  }

  #[inline]
  pub fn node_index(&self, key: &OctreeKey) -> Option<usize> {
    self.key_to_index.get(key).copied()
  }

  pub fn get(&self, key: &OctreeKey) -> Option<&OctreeNode> {
    self.node_index(key).and_then(|index| self.nodes.get(index))
  }

  /// Live (non-vacant) nodes with their arena indices.
  pub fn nodes(&self) -> impl Iterator<Item = (usize, &OctreeNode)> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, node)| !node.is_vacant())
  }

  #[inline]
  pub fn node_count(&self) -> usize {
    self.key_to_index.len()
  }

  pub fn leaf_count(&self) -> usize {
    self.nodes.iter().filter(|node| node.is_leaf()).count()
  }

  /// Arena length, vacant slots included.
  #[inline]
  pub fn arena_len(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn free_slot_count(&self) -> usize {
    self.free_slots.len()
  }

  /// Index of the leaf whose cube contains `position`.
  pub fn leaf_containing(&self, position: DVec3) -> Option<usize> {
    let mut index = *self
      .roots
      .iter()
      .find(|&&root| self.nodes[root].bounds().contains_point(position))?;
    loop {
      let node = &self.nodes[index];
      match &node.kind {
        NodeKind::Leaf { .. } => return Some(index),
        NodeKind::Internal { children } => {
          let c = node.center;
          let octant = (position.x >= c.x) as usize
            | ((position.y >= c.y) as usize) << 1
            | ((position.z >= c.z) as usize) << 2;
          index = children[octant];
        }
        NodeKind::Vacant => return None,
      }
    }
  }

  fn allocate(&mut self, node: OctreeNode) -> usize {
    match self.free_slots.pop() {
      Some(index) => {
        self.nodes[index] = node;
        index
      }
      None => {
        self.nodes.push(node);
        self.nodes.len() - 1
      }
    }
  }

  /// Split a leaf into 8 children.
  ///
  /// No-op returning false for internal or vacant nodes and for level 0.
  pub fn subdivide(&mut self, index: usize) -> bool {
    let Some(group) = self
      .nodes
      .get(index)
      .filter(|node| node.is_leaf())
      .and_then(|node| TransitionGroup::new_subdivide(node.key))
    else {
      return false;
    };
    self.apply(&group).is_some()
  }

  /// Collapse a node's subtree back into a leaf.
  ///
  /// No-op returning false when the node has no children.
  pub fn merge(&mut self, index: usize) -> bool {
    let Some(group) = self
      .nodes
      .get(index)
      .filter(|node| node.has_children())
      .and_then(|node| TransitionGroup::new_merge(node.key))
    else {
      return false;
    };
    self.apply(&group).is_some()
  }

  /// Apply a recorded transition to the node registered under its group key.
  ///
  /// Returns the number of chunks dropped, or `None` when the group no longer
  /// matches the tree (node gone, or already in the target shape).
  fn apply(&mut self, group: &TransitionGroup) -> Option<usize> {
    let index = self.node_index(&group.group_key)?;
    match group.transition_type {
      TransitionType::Subdivide => self.subdivide_node(index, &group.nodes_to_add),
      TransitionType::Merge => self.merge_node(index, &group.nodes_to_remove),
    }
  }

  /// Register `child_keys` as the leaf's children.
  ///
  /// Returns the number of chunks dropped (0 or 1).
  fn subdivide_node(&mut self, index: usize, child_keys: &[OctreeKey]) -> Option<usize> {
    let node = self.nodes.get(index)?;
    if !node.is_leaf() {
      return None;
    }
    let (key, center, size) = (node.key, node.center, node.size);
    if child_keys.len() != 8 || child_keys.iter().any(|child| child.parent() != key) {
      warn!(?key, "subdivide group does not describe this node's children");
      return None;
    }
    if let Some(existing) = child_keys.iter().find(|k| self.key_to_index.contains_key(k)) {
      warn!(?key, ?existing, "child key already registered, subdivide skipped");
      return None;
    }

    let quarter = size * 0.25;
    let mut children = [0usize; 8];
    for &child_key in child_keys {
      let octant = child_key.octant();
      // bit set → +quarter, clear → -quarter
      let sign = OctreeKey::octant_offset(octant).as_dvec3() * 2.0 - DVec3::ONE;
      let child_center = center + sign * quarter;
      let mut child = OctreeNode::new_leaf(child_key, child_center, size * 0.5, Some(index));
      child.distance_from_viewer = child_center.distance(self.viewer);
      let slot = self.allocate(child);
      self.key_to_index.insert(child_key, slot);
      children[octant as usize] = slot;
    }

    let node = &mut self.nodes[index];
    node.active = false;
    let previous = std::mem::replace(&mut node.kind, NodeKind::Internal { children });
    Some(matches!(previous, NodeKind::Leaf { chunk: Some(_) }) as usize)
  }

  /// Unregister `child_keys`, collapsing their subtrees first.
  ///
  /// Returns the number of chunks dropped across the subtree.
  fn merge_node(&mut self, index: usize, child_keys: &[OctreeKey]) -> Option<usize> {
    let children = *self.nodes.get(index)?.children()?;
    if child_keys.len() != 8
      || children
        .iter()
        .any(|&child| !child_keys.contains(&self.nodes[child].key))
    {
      warn!(key = ?self.nodes[index].key, "merge group does not describe this node's children");
      return None;
    }

    let mut dropped = 0;
    for &child_key in child_keys {
      let Some(child) = self.key_to_index.remove(&child_key) else {
        continue;
      };
      if let Some(nested) = self.nodes[child]
        .has_children()
        .then(|| TransitionGroup::new_merge(child_key))
        .flatten()
      {
        dropped += self.merge_node(child, &nested.nodes_to_remove).unwrap_or(0);
      }
      let cleared = std::mem::replace(&mut self.nodes[child], OctreeNode::vacant());
      if cleared.chunk().is_some() {
        dropped += 1;
      }
      self.free_slots.push(child);
    }

    let node = &mut self.nodes[index];
    node.kind = NodeKind::Leaf { chunk: None };
    node.active = true;
    Some(dropped)
  }

  /// Re-evaluate the whole tree against a new viewer position.
  #[tracing::instrument(level = "debug", skip(self))]
  pub fn update_lod(&mut self, viewer: DVec3) -> RefinementStats {
    self.viewer = viewer;
    let mut stats = RefinementStats::default();
    let mut transitions: Vec<TransitionGroup> = Vec::new();

    let mut queue: VecDeque<usize> = self.roots.iter().copied().collect();
    while let Some(index) = queue.pop_front() {
      let node = &mut self.nodes[index];
      let distance = node.center.distance(viewer);
      node.distance_from_viewer = distance;
      stats.nodes_visited += 1;

      match &node.kind {
        NodeKind::Leaf { .. } => {
          if self
            .settings
            .should_subdivide(node.size, node.key.level, distance)
          {
            transitions.extend(TransitionGroup::new_subdivide(node.key));
          }
        }
        NodeKind::Internal { children } => {
          if self.settings.should_merge(node.size, distance) {
            transitions.extend(TransitionGroup::new_merge(node.key));
          } else {
            queue.extend(children.iter().copied());
          }
        }
        NodeKind::Vacant => {}
      }
    }

    for group in transitions.iter().filter(|group| group.is_subdivide()) {
      if let Some(dropped) = self.apply(group) {
        stats.subdivisions_performed += 1;
        stats.chunks_dropped += dropped;
      }
    }

    for group in transitions.iter().filter(|group| !group.is_subdivide()) {
      if let Some(dropped) = self.apply(group) {
        stats.merges_performed += 1;
        stats.chunks_dropped += dropped;
      }
    }

    stats.chunks_created = self.refresh_activity();

    debug!(
      visited = stats.nodes_visited,
      subdivisions = stats.subdivisions_performed,
      merges = stats.merges_performed,
      chunks_created = stats.chunks_created,
      chunks_dropped = stats.chunks_dropped,
      leaves = self.leaf_count(),
      "lod updated"
    );
    stats
  }

  /// Mark leaves active (creating missing chunks) and internal nodes inactive.
  ///
  /// Returns the number of chunks created.
  fn refresh_activity(&mut self) -> usize {
    let resolution = self.settings.chunk_resolution;
    let mut created = 0;
    for node in &mut self.nodes {
      match &mut node.kind {
        NodeKind::Leaf { chunk } => {
          node.active = true;
          if chunk.is_none() {
            *chunk = Some(Chunk::new(
              node.center.as_vec3(),
              node.size as f32,
              node.key.level.max(0) as u32,
              resolution,
            ));
            created += 1;
          }
        }
        NodeKind::Internal { .. } | NodeKind::Vacant => node.active = false,
      }
    }
    created
  }

  /// Every generated chunk on an active leaf, in arena order.
  pub fn active_chunks(&self) -> Vec<ActiveChunk<'_>> {
    self.active_chunks_where(|_| true)
  }

  /// Active chunks whose node overlaps `region`.
  pub fn active_chunks_in(&self, region: &DAabb3) -> Vec<ActiveChunk<'_>> {
    self.active_chunks_where(|node| node.bounds().overlaps(region))
  }

  fn active_chunks_where(&self, keep: impl Fn(&OctreeNode) -> bool) -> Vec<ActiveChunk<'_>> {
    self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, node)| node.active && keep(node))
      .filter_map(|(node_index, node)| {
        let chunk = node.chunk().filter(|chunk| chunk.is_generated())?;
        Some(ActiveChunk {
          key: node.key,
          node_index,
          position: chunk.position(),
          chunk,
        })
      })
      .collect()
  }

  /// Number of generated chunks on active leaves.
  pub fn active_chunk_count(&self) -> usize {
    self
      .nodes
      .iter()
      .filter(|node| node.active)
      .filter_map(OctreeNode::chunk)
      .filter(|chunk| chunk.is_generated())
      .count()
  }

  /// Active chunks not yet generated or generating.
  pub fn pending_chunk_count(&self) -> usize {
    self
      .nodes
      .iter()
      .filter(|node| node.active)
      .filter_map(OctreeNode::chunk)
      .filter(|chunk| chunk.needs_generation())
      .count()
  }

  /// Claim every active chunk that still needs a mesh, nearest first.
  pub fn pending_jobs(&mut self) -> Vec<ChunkTask> {
    let mut pending: Vec<(f64, ChunkTask)> = self
      .nodes
      .iter_mut()
      .filter(|node| node.active)
      .filter_map(|node| {
        let key = node.key;
        let distance = node.distance_from_viewer;
        let chunk = node.chunk_mut()?;
        if !chunk.needs_generation() {
          return None;
        }
        let job = chunk.begin_generation()?;
        Some((distance, ChunkTask { key, job }))
      })
      .collect();
    pending.sort_by(|a, b| a.0.total_cmp(&b.0));
    pending.into_iter().map(|(_, task)| task).collect()
  }

  /// Install a finished job.
  ///
  /// Returns false and discards the result when the node was merged or
  /// subdivided away, or now holds a different chunk.
  pub fn complete_generation(&mut self, key: &OctreeKey, result: ChunkMeshResult) -> bool {
    let Some(chunk) = self
      .node_index(key)
      .and_then(|index| self.nodes[index].chunk_mut())
    else {
      trace!(?key, chunk = result.chunk_id.raw(), "stale chunk result discarded");
      return false;
    };
    chunk.finish_generation(result)
  }

  /// Generate every pending active chunk in parallel on the rayon pool.
  ///
  /// Returns the number of chunks generated.
  #[tracing::instrument(level = "debug", skip_all)]
  pub fn generate_pending_chunks<S: DensitySampler + ?Sized>(&mut self, sampler: &S) -> usize {
    let generated = self
      .nodes
      .par_iter_mut()
      .filter(|node| node.active)
      .filter_map(OctreeNode::chunk_mut)
      .filter(|chunk| chunk.needs_generation())
      .map(|chunk| chunk.generate_mesh(Some(sampler)))
      .count();
    debug!(generated, "pending chunks generated");
    generated
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
