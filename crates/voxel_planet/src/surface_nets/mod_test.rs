use std::collections::HashMap;

use glam::Vec3;

use super::*;
use crate::sdf_samplers::{RippledSphereSampler, SphereSampler, TiltedPlaneSampler};

/// 18³ lattice with unit voxels centred on the origin.
fn sphere_field(radius: f32) -> DensityField {
  DensityField::sample(&SphereSampler::new(radius), 18, Vec3::splat(-9.0), 1.0)
    .expect("valid lattice")
}

/// Padded chunk lattice: `resolution + 2` samples starting one voxel below `min`.
fn chunk_field<S: crate::density::DensitySampler>(
  sampler: &S,
  min: Vec3,
  resolution: usize,
  voxel_size: f32,
) -> DensityField {
  DensityField::sample(sampler, resolution + 2, min - Vec3::splat(voxel_size), voxel_size)
    .expect("valid lattice")
}

fn chunk_bounds(resolution: usize) -> ExtractionBounds {
  ExtractionBounds::uniform(1, resolution + 1)
}

fn quantize(v: Vec3) -> [i64; 3] {
  (v * 1024.0).round().to_array().map(|c| c as i64)
}

/// Count directed triangle edges of meshes welded by vertex position.
fn directed_edges(meshes: &[&Mesh]) -> HashMap<([i64; 3], [i64; 3]), usize> {
  let mut edges = HashMap::new();
  for mesh in meshes {
    for [a, b, c] in mesh.triangles() {
      let p = [a, b, c].map(|i| quantize(mesh.vertices[i as usize]));
      for k in 0..3 {
        *edges.entry((p[k], p[(k + 1) % 3])).or_insert(0) += 1;
      }
    }
  }
  edges
}

/// Every edge used once in each direction: closed and consistently wound.
fn assert_closed_manifold(meshes: &[&Mesh]) {
  let edges = directed_edges(meshes);
  assert!(!edges.is_empty());
  for (&(a, b), &count) in &edges {
    assert_eq!(count, 1, "edge {:?} -> {:?} used {} times", a, b, count);
    assert_eq!(
      edges.get(&(b, a)),
      Some(&1),
      "edge {:?} -> {:?} has no opposite half",
      a,
      b
    );
  }
}

#[test]
fn test_empty_field_produces_no_mesh() {
  let field = DensityField::from_samples(vec![1.0; 8 * 8 * 8], 8, Vec3::ZERO, 1.0).unwrap();
  let mesh = generate(&field, None);

  assert!(mesh.is_empty());
  assert_eq!(mesh.triangle_count(), 0);
}

#[test]
fn test_solid_field_produces_no_mesh() {
  let field = DensityField::from_samples(vec![-1.0; 8 * 8 * 8], 8, Vec3::ZERO, 1.0).unwrap();
  let mesh = generate(&field, None);

  assert!(mesh.is_empty());
  assert_eq!(mesh.triangle_count(), 0);
}

#[test]
fn test_empty_bounds_produce_no_mesh() {
  let field = sphere_field(5.0);
  let mesh = generate(&field, Some(ExtractionBounds::uniform(4, 4)));
  assert!(mesh.is_empty());
}

#[test]
fn test_sphere_normals_point_outward() {
  let field = sphere_field(10.0);
  let mesh = generate(&field, None);

  assert!(!mesh.is_empty());
  assert!(mesh.is_consistent());

  let outward = mesh
    .vertices
    .iter()
    .zip(&mesh.normals)
    .filter(|(v, n)| n.dot(**v) > 0.0)
    .count();
  assert!(
    outward as f32 >= 0.95 * mesh.vertices.len() as f32,
    "only {} of {} normals point outward",
    outward,
    mesh.vertices.len()
  );
}

#[test]
fn test_normals_are_unit_length() {
  let mesh = generate(&sphere_field(6.0), None);
  for n in &mesh.normals {
    assert!((n.length() - 1.0).abs() < 1e-4, "normal {:?}", n);
  }
}

#[test]
fn test_vertices_lie_near_sphere() {
  let mesh = generate(&sphere_field(6.0), None);
  for v in &mesh.vertices {
    assert!((v.length() - 6.0).abs() < 1.0, "vertex {:?} off surface", v);
  }
}

#[test]
fn test_small_sphere_is_closed_manifold() {
  let mesh = generate(&sphere_field(5.0), None);
  assert_closed_manifold(&[&mesh]);
}

#[test]
fn test_winding_faces_outward() {
  let mesh = generate(&sphere_field(6.0), None);

  let mut outward = 0;
  for [a, b, c] in mesh.triangles() {
    let [p0, p1, p2] = [a, b, c].map(|i| mesh.vertices[i as usize]);
    let face_normal = (p1 - p0).cross(p2 - p0);
    let centroid = (p0 + p1 + p2) / 3.0;
    if face_normal.dot(centroid) > 0.0 {
      outward += 1;
    }
  }
  assert_eq!(outward, mesh.triangle_count(), "inward-facing triangles");
}

#[test]
fn test_no_invalid_or_degenerate_triangles() {
  let field = DensityField::sample(
    &RippledSphereSampler::new(6.0, 1.5, 0.9),
    18,
    Vec3::splat(-9.0),
    1.0,
  )
  .unwrap();
  let mesh = generate(&field, None);

  assert!(mesh.is_consistent());
  for [a, b, c] in mesh.triangles() {
    assert!(a != b && b != c && a != c, "degenerate triangle {:?}", [a, b, c]);
  }
}

#[test]
fn test_generation_is_deterministic() {
  let sampler = RippledSphereSampler::new(6.0, 1.0, 0.7);
  let a = DensityField::sample(&sampler, 18, Vec3::splat(-9.0), 1.0).unwrap();
  let b = DensityField::sample(&sampler, 18, Vec3::splat(-9.0), 1.0).unwrap();

  assert_eq!(generate(&a, None), generate(&b, None));
}

#[test]
fn test_vertices_respect_voxel_size_and_origin() {
  let origin = Vec3::new(100.0, -50.0, 7.0);
  let sampler = SphereSampler::new(10.0).with_center(origin + Vec3::splat(18.0));
  let field = DensityField::sample(&sampler, 18, origin, 2.0).unwrap();
  let mesh = generate(&field, None);

  assert!(!mesh.is_empty());
  for v in &mesh.vertices {
    assert!((v.distance(sampler.center) - 10.0).abs() < 2.0);
  }
}

#[test]
fn test_bounds_limit_emitted_geometry() {
  let field = sphere_field(5.0);
  let full = generate(&field, None);
  // Cells 1..9 cover x in [-8, 0): roughly half the sphere.
  let half = generate(
    &field,
    Some(ExtractionBounds::new([1, 1, 1], [9, 17, 17])),
  );

  assert!(!half.is_empty());
  assert!(half.triangle_count() < full.triangle_count());
  for v in &half.vertices {
    assert!(v.x <= 0.0 + 1e-5);
  }
}

#[test]
fn test_plane_chunks_tile_without_duplicates() {
  let sampler = TiltedPlaneSampler::new().with_angle_degrees(30.0);
  let resolution = 8;

  let a = chunk_field(&sampler, Vec3::new(-8.0, -4.0, -4.0), resolution, 1.0);
  let b = chunk_field(&sampler, Vec3::new(0.0, -4.0, -4.0), resolution, 1.0);
  let mesh_a = generate(&a, Some(chunk_bounds(resolution)));
  let mesh_b = generate(&b, Some(chunk_bounds(resolution)));

  // One lattice spanning both chunks with the same padding.
  let whole = DensityField::sample(&sampler, 2 * resolution + 2, Vec3::splat(-9.0), 1.0).unwrap();
  let mesh_whole = generate(
    &whole,
    Some(ExtractionBounds::new([1, 5, 5], [17, 13, 13])),
  );

  assert!(!mesh_a.is_empty() && !mesh_b.is_empty());
  assert_eq!(
    mesh_a.triangle_count() + mesh_b.triangle_count(),
    mesh_whole.triangle_count()
  );
}

#[test]
fn test_seam_vertices_coincide() {
  let sampler = SphereSampler::new(3.0);
  let resolution = 8;

  let a = chunk_field(&sampler, Vec3::new(-8.0, -4.0, -4.0), resolution, 1.0);
  let b = chunk_field(&sampler, Vec3::new(0.0, -4.0, -4.0), resolution, 1.0);
  let mesh_a = generate(&a, Some(chunk_bounds(resolution)));
  let mesh_b = generate(&b, Some(chunk_bounds(resolution)));

  // B's apron vertices (x < 0) must be A's boundary vertices.
  let apron: Vec<Vec3> = mesh_b.vertices.iter().copied().filter(|v| v.x < 0.0).collect();
  assert!(!apron.is_empty());
  for v in apron {
    assert!(
      mesh_a.vertices.iter().any(|w| w.distance(v) < 1e-4),
      "apron vertex {:?} has no match in the neighbour",
      v
    );
  }

  // Welded together the two halves close up the sphere.
  assert_closed_manifold(&[&mesh_a, &mesh_b]);
}
