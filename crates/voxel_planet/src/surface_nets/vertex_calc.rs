//! Vertex position calculation for Surface Nets.
//!
//! A surface cell gets one vertex at the centroid of the zero crossings on
//! its 12 edges.

use glam::Vec3A;

use crate::edge_table::{corner_position, crossing_edges};

/// Precomputed corner positions within unit cube.
/// Layout matches corner index bits: corner i = (x=bit0, y=bit1, z=bit2)
pub const CORNER_POSITIONS: [Vec3A; 8] = {
  let mut positions = [Vec3A::ZERO; 8];
  let mut i = 0;
  while i < 8 {
    let [x, y, z] = corner_position(i as u8);
    positions[i] = Vec3A::new(x, y, z);
    i += 1;
  }
  positions
};

/// Offset used when no edge crossing can be found.
pub const CELL_CENTER: Vec3A = Vec3A::splat(0.5);

/// Zero-crossing parameter along an edge from density `d0` to `d1`.
///
/// Clamped to `[0, 1]` so near-equal densities never push a crossing out of
/// its edge.
#[inline(always)]
pub fn crossing_t(d0: f32, d1: f32) -> f32 {
  let t = d0 / (d0 - d1);
  if t.is_finite() {
    t.clamp(0.0, 1.0)
  } else {
    0.5
  }
}

/// Compute the vertex offset inside the cell as the centroid of edge crossings.
///
/// `corner_mask` must be the mask built from `samples`. A mask with no
/// crossing edges falls back to the cell center.
#[inline]
pub fn compute_offset(samples: &[f32; 8], corner_mask: u8) -> Vec3A {
  let mut sum = Vec3A::ZERO;
  let mut count = 0u32;

  for [c0, c1] in crossing_edges(corner_mask) {
    let (c0, c1) = (c0 as usize, c1 as usize);
    let t = crossing_t(samples[c0], samples[c1]);
    let p0 = CORNER_POSITIONS[c0];
    let p1 = CORNER_POSITIONS[c1];
    sum += p0 + t * (p1 - p0);
    count += 1;
  }

  if count == 0 {
    return CELL_CENTER;
  }

  sum / count as f32
}

#[cfg(test)]
#[path = "vertex_calc_test.rs"]
mod vertex_calc_test;
