//! Benchmarks for Surface Nets extraction on f32 density lattices.
//!
//! The 19³ lattice is a default chunk (16 cells, two samples of negative
//! padding and the far corner); the larger sizes show how extraction scales.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::Vec3;
use voxel_planet::sdf_samplers::{RippledSphereSampler, SphereSampler, UnionSampler};
use voxel_planet::{
  padded_size, surface_nets, DensityField, DensitySampler, ExtractionBounds, PADDING,
};

/// Sample `sampler` on a `size`³ lattice centred on the origin.
fn centred_field<S: DensitySampler>(sampler: &S, size: usize) -> DensityField {
  let origin = Vec3::splat(-(size as f32 - 1.0) * 0.5);
  DensityField::sample(sampler, size, origin, 1.0).expect("lattice size >= 2")
}

/// One default chunk lattice through a sphere.
fn bench_chunk_sphere(c: &mut Criterion) {
  let size = padded_size(16);
  let field = centred_field(&SphereSampler::new(6.0), size);
  let bounds = ExtractionBounds::uniform(PADDING, size - 1);

  c.bench_function("surface_nets::generate (19³ chunk sphere)", |b| {
    b.iter(|| black_box(surface_nets::generate(black_box(&field), Some(bounds))))
  });
}

/// Extraction cost against lattice size.
fn bench_lattice_sizes(c: &mut Criterion) {
  let mut group = c.benchmark_group("surface_nets_lattice");

  for size in [10usize, 18, 34, 66] {
    let radius = size as f32 * 0.35;
    let field = centred_field(&SphereSampler::new(radius), size);
    group.throughput(Throughput::Elements((size * size * size) as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &field, |b, field| {
      b.iter(|| black_box(surface_nets::generate(black_box(field), None)))
    });
  }

  group.finish();
}

/// Busier surfaces (simulating terrain detail).
fn bench_complex_sdf(c: &mut Criterion) {
  let mut group = c.benchmark_group("complex_sdf");
  let size = 34;

  let rippled = centred_field(&RippledSphereSampler::new(11.0, 1.5, 0.6), size);
  group.bench_function("rippled sphere (34³)", |b| {
    b.iter(|| black_box(surface_nets::generate(black_box(&rippled), None)))
  });

  let blobs = UnionSampler::new(
    UnionSampler::new(
      SphereSampler::new(7.0).with_center(Vec3::new(-6.0, 0.0, 0.0)),
      SphereSampler::new(7.0).with_center(Vec3::new(6.0, 0.0, 0.0)),
    ),
    SphereSampler::new(5.0).with_center(Vec3::new(0.0, 7.0, 0.0)),
  );
  let blobs = centred_field(&blobs, size);
  group.bench_function("3 spheres (34³)", |b| {
    b.iter(|| black_box(surface_nets::generate(black_box(&blobs), None)))
  });

  group.finish();
}

/// Sampling the lattice, which chunk jobs pay before extraction.
fn bench_sampling(c: &mut Criterion) {
  let sampler = RippledSphereSampler::new(6.0, 0.5, 1.0);
  c.bench_function("DensityField::sample (19³ rippled sphere)", |b| {
    b.iter(|| black_box(centred_field(black_box(&sampler), padded_size(16))))
  });
}

criterion_group!(
  benches,
  bench_chunk_sphere,
  bench_lattice_sizes,
  bench_complex_sdf,
  bench_sampling
);
criterion_main!(benches);
