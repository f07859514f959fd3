//! Density sampling and the cubic lattice it is stored on.
//!
//! Negative density is solid interior; zero and positive are exterior.

use glam::Vec3;
use thiserror::Error;

use crate::constants::{lattice_index, CORNER_OFFSETS, OUT_OF_RANGE_DENSITY};

/// External density function: world position → signed density.
///
/// Must be pure and callable from any thread that generates chunks.
/// Any `Fn(Vec3) -> f32 + Send + Sync` closure is a sampler.
pub trait DensitySampler: Send + Sync {
  fn sample_density(&self, position: Vec3) -> f32;
}

impl<F> DensitySampler for F
where
  F: Fn(Vec3) -> f32 + Send + Sync,
{
  #[inline]
  fn sample_density(&self, position: Vec3) -> f32 {
    self(position)
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DensityFieldError {
  #[error("density lattice needs at least 2 samples per axis, got {0}")]
  TooSmall(usize),
  #[error("a {size}³ lattice needs {expected} samples, got {actual}")]
  SampleCountMismatch {
    size: usize,
    expected: usize,
    actual: usize,
  },
}

/// Cubic lattice of density samples with its world-space placement.
///
/// Sample `(x, y, z)` sits at `origin + (x, y, z) * voxel_size`.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityField {
  samples: Vec<f32>,
  size: usize,
  origin: Vec3,
  voxel_size: f32,
}

impl DensityField {
  /// Wrap precomputed samples laid out as `(x * N + y) * N + z`.
  pub fn from_samples(
    samples: Vec<f32>,
    size: usize,
    origin: Vec3,
    voxel_size: f32,
  ) -> Result<Self, DensityFieldError> {
    if size < 2 {
      return Err(DensityFieldError::TooSmall(size));
    }
    let expected = size * size * size;
    if samples.len() != expected {
      return Err(DensityFieldError::SampleCountMismatch {
        size,
        expected,
        actual: samples.len(),
      });
    }
    Ok(Self {
      samples,
      size,
      origin,
      voxel_size,
    })
  }

  /// Build a field by calling `sampler` once per lattice point.
  pub fn sample<S: DensitySampler + ?Sized>(
    sampler: &S,
    size: usize,
    origin: Vec3,
    voxel_size: f32,
  ) -> Result<Self, DensityFieldError> {
    if size < 2 {
      return Err(DensityFieldError::TooSmall(size));
    }
    let mut samples = Vec::with_capacity(size * size * size);
    for x in 0..size {
      for y in 0..size {
        for z in 0..size {
          let position = origin + Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
          samples.push(sampler.sample_density(position));
        }
      }
    }
    Self::from_samples(samples, size, origin, voxel_size)
  }

  /// Samples per axis.
  #[inline]
  pub fn size(&self) -> usize {
    self.size
  }

  #[inline]
  pub fn origin(&self) -> Vec3 {
    self.origin
  }

  #[inline]
  pub fn voxel_size(&self) -> f32 {
    self.voxel_size
  }

  #[inline]
  pub fn samples(&self) -> &[f32] {
    &self.samples
  }

  /// Density at a lattice point; out-of-range points read as exterior.
  #[inline]
  pub fn density(&self, x: isize, y: isize, z: isize) -> f32 {
    let n = self.size as isize;
    if x < 0 || y < 0 || z < 0 || x >= n || y >= n || z >= n {
      return OUT_OF_RANGE_DENSITY;
    }
    self.samples[lattice_index(x as usize, y as usize, z as usize, self.size)]
  }

  /// Density at an unsigned lattice point (out-of-range reads as exterior).
  #[inline]
  pub fn density_at(&self, point: [usize; 3]) -> f32 {
    self.density(point[0] as isize, point[1] as isize, point[2] as isize)
  }

  /// The 8 corner densities of the cell whose base sample is `cell`.
  #[inline]
  pub fn cell_corners(&self, cell: [usize; 3]) -> [f32; 8] {
    std::array::from_fn(|i| {
      let o = CORNER_OFFSETS[i];
      self.density_at([cell[0] + o[0], cell[1] + o[1], cell[2] + o[2]])
    })
  }

  /// World position of a (possibly fractional) lattice coordinate.
  #[inline]
  pub fn world_position(&self, lattice: Vec3) -> Vec3 {
    self.origin + lattice * self.voxel_size
  }

  /// True when samples of both signs are present.
  pub fn has_surface(&self) -> bool {
    let mut interior = false;
    let mut exterior = false;
    for &d in &self.samples {
      if d < 0.0 {
        interior = true;
      } else {
        exterior = true;
      }
      if interior && exterior {
        return true;
      }
    }
    false
  }
}

#[cfg(test)]
#[path = "density_test.rs"]
mod density_test;
