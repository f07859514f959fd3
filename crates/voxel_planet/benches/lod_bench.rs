//! Benchmarks for octree LOD updates and chunk generation.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glam::DVec3;
use voxel_planet::sdf_samplers::SphereSampler;
use voxel_planet::{OctreeSettings, OctreeTree};

fn settings() -> OctreeSettings {
  OctreeSettings::default()
    .with_root_size(4000.0)
    .with_max_depth(6)
    .with_subdivision_distance(100.0)
    .with_chunk_resolution(16)
}

/// Tree refined around `viewer` until it stops changing.
fn settled_tree(viewer: DVec3) -> OctreeTree {
  let mut tree = OctreeTree::new(settings()).expect("valid settings");
  while !tree.update_lod(viewer).is_structurally_stable() {}
  tree
}

/// Walking the tree when nothing changes: the steady-state cost per tick.
fn bench_stable_update(c: &mut Criterion) {
  let viewer = DVec3::new(0.0, 1500.0, 0.0);
  let mut tree = settled_tree(viewer);

  c.bench_function("update_lod (settled, depth 6)", |b| {
    b.iter(|| black_box(tree.update_lod(black_box(viewer))))
  });
}

/// Refining from a single root to the settled frontier.
fn bench_refine_from_root(c: &mut Criterion) {
  let viewer = DVec3::new(0.0, 1500.0, 0.0);

  c.bench_function("update_lod (root to settled)", |b| {
    b.iter_batched(
      || OctreeTree::new(settings()).expect("valid settings"),
      |mut tree| {
        while !tree.update_lod(viewer).is_structurally_stable() {}
        black_box(tree.leaf_count())
      },
      BatchSize::SmallInput,
    )
  });
}

/// Viewer crossing the planet, forcing merges on one side and splits on the other.
fn bench_viewer_flyover(c: &mut Criterion) {
  let near = DVec3::new(0.0, 1500.0, 0.0);
  let far = DVec3::new(0.0, -1500.0, 0.0);

  c.bench_function("update_lod (flyover)", |b| {
    b.iter_batched(
      || settled_tree(near),
      |mut tree| {
        for _ in 0..8 {
          black_box(tree.update_lod(far));
        }
        tree
      },
      BatchSize::SmallInput,
    )
  });
}

/// Meshing every active chunk of a settled tree on the rayon pool.
fn bench_generate_pending(c: &mut Criterion) {
  let viewer = DVec3::new(0.0, 1500.0, 0.0);
  let sampler = SphereSampler::new(1500.0);
  let mut group = c.benchmark_group("generate_pending_chunks");
  group.sample_size(10);

  group.bench_function("planet r=1500", |b| {
    b.iter_batched(
      || settled_tree(viewer),
      |mut tree| black_box(tree.generate_pending_chunks(&sampler)),
      BatchSize::LargeInput,
    )
  });

  group.finish();
}

criterion_group!(
  benches,
  bench_stable_update,
  bench_refine_from_root,
  bench_viewer_flyover,
  bench_generate_pending
);
criterion_main!(benches);
