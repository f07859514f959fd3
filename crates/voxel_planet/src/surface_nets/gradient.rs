//! Gradient/normal computation.
//!
//! The density field is negative inside, so its gradient points from solid
//! toward air and the normalized gradient is the outward surface normal.
//!
//! Two estimators are provided:
//! - central differences on the lattice at a cell's base corner (primary)
//! - the 2x2x2 stencil over a cell's own corners (fallback)

use glam::{Vec3, Vec3A};

use crate::density::DensityField;

/// Gradients shorter than this are treated as vanishing.
const MIN_GRADIENT_LENGTH_SQ: f32 = 1e-12;

/// Normal used when no gradient can be estimated.
pub const FALLBACK_NORMAL: Vec3 = Vec3::Y;

/// Central-difference gradient of the lattice at `point`.
///
/// Points on the lattice border use one-sided differences so no out-of-range
/// sentinel leaks into the estimate.
#[inline]
pub fn central_difference(field: &DensityField, point: [usize; 3]) -> Vec3A {
  let last = field.size() - 1;
  let mut gradient = [0.0f32; 3];

  for (axis, g) in gradient.iter_mut().enumerate() {
    let mut lo = point;
    let mut hi = point;
    lo[axis] = point[axis].saturating_sub(1);
    hi[axis] = (point[axis] + 1).min(last);
    let span = (hi[axis] - lo[axis]) as f32;
    if span > 0.0 {
      *g = (field.density_at(hi) - field.density_at(lo)) / span;
    }
  }

  Vec3A::from_array(gradient)
}

/// Gradient from the 8 corner samples of a cell.
///
/// Corner layout:
/// ```text
/// 0: (0,0,0)  4: (0,0,1)
/// 1: (1,0,0)  5: (1,0,1)
/// 2: (0,1,0)  6: (0,1,1)
/// 3: (1,1,0)  7: (1,1,1)
/// ```
#[inline]
pub fn compute(samples: &[f32; 8]) -> Vec3A {
  // X gradient: sum of right face - sum of left face
  let gx = (samples[1] + samples[3] + samples[5] + samples[7])
    - (samples[0] + samples[2] + samples[4] + samples[6]);

  // Y gradient: sum of top face - sum of bottom face
  let gy = (samples[2] + samples[3] + samples[6] + samples[7])
    - (samples[0] + samples[1] + samples[4] + samples[5]);

  // Z gradient: sum of front face - sum of back face
  let gz = (samples[4] + samples[5] + samples[6] + samples[7])
    - (samples[0] + samples[1] + samples[2] + samples[3]);

  Vec3A::new(gx, gy, gz)
}

/// Normalize a gradient, or `None` when it vanishes or is not finite.
#[inline]
pub fn try_normalize(gradient: Vec3A) -> Option<Vec3> {
  let len_sq = gradient.length_squared();
  if !len_sq.is_finite() || len_sq < MIN_GRADIENT_LENGTH_SQ {
    return None;
  }
  Some(Vec3::from(gradient * len_sq.sqrt().recip()))
}

/// Outward unit normal for the vertex of the cell based at `cell`.
#[inline]
pub fn vertex_normal(field: &DensityField, cell: [usize; 3], corners: &[f32; 8]) -> Vec3 {
  try_normalize(central_difference(field, cell))
    .or_else(|| try_normalize(compute(corners)))
    .unwrap_or(FALLBACK_NORMAL)
}

#[cfg(test)]
#[path = "gradient_test.rs"]
mod gradient_test;
