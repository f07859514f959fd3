use std::sync::Arc;

use glam::DVec3;

use super::*;
use crate::octree::OctreeSettings;
use crate::sdf_samplers::SphereSampler;

fn settings() -> OctreeSettings {
  OctreeSettings::new()
    .with_root_size(1000.0)
    .with_max_depth(4)
    .with_subdivision_distance(50.0)
    .with_chunk_resolution(4)
}

fn sampler() -> Arc<SphereSampler> {
  Arc::new(SphereSampler::new(300.0))
}

#[test]
fn test_new_queue_is_idle() {
  let queue = ChunkTaskQueue::new();
  assert!(queue.is_idle());
  assert_eq!(queue.outstanding(), 0);
  assert_eq!(queue.in_flight_count(), 0);
}

#[test]
fn test_dispatch_and_wait_installs_root_mesh() {
  let mut tree = OctreeTree::new(settings()).unwrap();
  let mut queue = ChunkTaskQueue::new();

  let spawned = queue.dispatch(&mut tree, &sampler());
  assert_eq!(spawned, 1);
  assert_eq!(tree.pending_chunk_count(), 0, "dispatched chunks are claimed");

  let stats = queue.wait_idle(&mut tree);
  assert_eq!(stats.installed, 1);
  assert_eq!(stats.discarded, 0);
  assert_eq!(stats.mesh_times_us.len(), 1);
  assert!(queue.is_idle());
  assert_eq!(queue.in_flight_count(), 0);

  let active = tree.active_chunks();
  assert_eq!(active.len(), 1);
  assert!(active[0].chunk.is_generated());
  assert!(!active[0].chunk.mesh().is_empty(), "root chunk crosses the sphere");
}

#[test]
fn test_second_dispatch_spawns_nothing() {
  let mut tree = OctreeTree::new(settings()).unwrap();
  let mut queue = ChunkTaskQueue::new();
  let sampler = sampler();

  assert_eq!(queue.dispatch(&mut tree, &sampler), 1);
  assert_eq!(queue.dispatch(&mut tree, &sampler), 0, "chunk already claimed");
  queue.wait_idle(&mut tree);
  assert_eq!(queue.dispatch(&mut tree, &sampler), 0, "chunk already generated");
}

#[test]
fn test_dispatch_after_subdivide_covers_all_children() {
  let mut tree = OctreeTree::new(settings()).unwrap();
  let mut queue = ChunkTaskQueue::new();
  let sampler = sampler();

  tree.update_lod(DVec3::new(10.0, 0.0, 0.0));
  assert_eq!(tree.leaf_count(), 8);
  assert_eq!(tree.active_chunk_count(), 0, "nothing generated yet");

  assert_eq!(queue.dispatch(&mut tree, &sampler), 8);
  let stats = queue.wait_idle(&mut tree);
  assert_eq!(stats.total(), 8);
  assert_eq!(stats.installed, 8);
  assert_eq!(tree.active_chunk_count(), 8);
}

#[test]
fn test_results_for_merged_nodes_are_discarded() {
  let mut tree = OctreeTree::new(settings()).unwrap();
  let mut queue = ChunkTaskQueue::new();
  let sampler = sampler();

  tree.update_lod(DVec3::ZERO);
  assert_eq!(queue.dispatch(&mut tree, &sampler), 8);

  // Move far away before collecting; the children merge back into the root.
  tree.update_lod(DVec3::new(1.0e6, 0.0, 0.0));
  assert_eq!(tree.leaf_count(), 1);

  let stats = queue.wait_idle(&mut tree);
  assert_eq!(stats.discarded, 8);
  assert_eq!(stats.installed, 0);
  assert_eq!(tree.pending_chunk_count(), 1, "root needs a fresh mesh");
}

#[test]
fn test_collect_eventually_drains() {
  let mut tree = OctreeTree::new(settings()).unwrap();
  let mut queue = ChunkTaskQueue::new();
  queue.dispatch(&mut tree, &sampler());

  let mut installed = 0;
  let deadline = web_time::Instant::now() + std::time::Duration::from_secs(30);
  while !queue.is_idle() && web_time::Instant::now() < deadline {
    installed += queue.collect(&mut tree).installed;
    std::thread::yield_now();
  }
  assert!(queue.is_idle());
  assert_eq!(installed, 1);
}

#[test]
fn test_closure_sampler_is_dispatchable() {
  let mut tree = OctreeTree::new(settings()).unwrap();
  let mut queue = ChunkTaskQueue::new();
  let plane = Arc::new(|p: glam::Vec3| p.y - 1.5);

  assert_eq!(queue.dispatch(&mut tree, &plane), 1);
  let stats = queue.wait_idle(&mut tree);
  assert_eq!(stats.installed, 1);
  let mesh = tree.active_chunks()[0].chunk.mesh().clone();
  assert!(mesh.is_consistent());
  assert!(mesh.triangle_count() > 0);
}
