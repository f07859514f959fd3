//! Simple SDF samplers for testing and debugging.
//!
//! These samplers implement deterministic mathematical density functions that
//! are easy to verify. Use them to test chunk tiling coherency without a noise
//! provider.

use glam::Vec3;

use crate::density::DensitySampler;

/// Sphere SDF sampler.
///
/// Simple test case with radial symmetry.
#[derive(Clone, Debug)]
pub struct SphereSampler {
  pub center: Vec3,
  pub radius: f32,
}

impl Default for SphereSampler {
  fn default() -> Self {
    Self {
      center: Vec3::ZERO,
      radius: 20.0,
    }
  }
}

impl SphereSampler {
  pub fn new(radius: f32) -> Self {
    Self {
      center: Vec3::ZERO,
      radius,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl DensitySampler for SphereSampler {
  #[inline]
  fn sample_density(&self, position: Vec3) -> f32 {
    position.distance(self.center) - self.radius
  }
}

/// Sphere with a sinusoidal surface ripple, a stand-in for noisy terrain.
///
/// SDF: `|p - center| - radius - amplitude * sin(fx) * sin(fy) * sin(fz)`
#[derive(Clone, Debug)]
pub struct RippledSphereSampler {
  pub center: Vec3,
  pub radius: f32,
  pub amplitude: f32,
  pub frequency: f32,
}

impl RippledSphereSampler {
  pub fn new(radius: f32, amplitude: f32, frequency: f32) -> Self {
    Self {
      center: Vec3::ZERO,
      radius,
      amplitude,
      frequency,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl DensitySampler for RippledSphereSampler {
  fn sample_density(&self, position: Vec3) -> f32 {
    let p = (position - self.center) * self.frequency;
    let ripple = p.x.sin() * p.y.sin() * p.z.sin();
    position.distance(self.center) - self.radius - self.amplitude * ripple
  }
}

/// Flat ground plane. Solid below `height`.
#[derive(Clone, Debug, Default)]
pub struct GroundPlaneSampler {
  pub height: f32,
}

impl GroundPlaneSampler {
  pub fn new(height: f32) -> Self {
    Self { height }
  }
}

impl DensitySampler for GroundPlaneSampler {
  #[inline]
  fn sample_density(&self, position: Vec3) -> f32 {
    position.y - self.height
  }
}

/// Tilted plane SDF sampler.
///
/// Crosses many chunk boundaries at a predictable angle, which makes it the
/// go-to field for seam tests.
///
/// SDF: `(y - height) * cos(angle) - x * sin(angle)`
#[derive(Clone, Debug)]
pub struct TiltedPlaneSampler {
  pub height: f32,
  /// Tilt around Z in radians.
  pub angle: f32,
}

impl Default for TiltedPlaneSampler {
  fn default() -> Self {
    Self {
      height: 0.0,
      angle: std::f32::consts::FRAC_PI_4,
    }
  }
}

impl TiltedPlaneSampler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_height(mut self, height: f32) -> Self {
    self.height = height;
    self
  }

  pub fn with_angle_degrees(mut self, degrees: f32) -> Self {
    self.angle = degrees.to_radians();
    self
  }
}

impl DensitySampler for TiltedPlaneSampler {
  #[inline]
  fn sample_density(&self, position: Vec3) -> f32 {
    (position.y - self.height) * self.angle.cos() - position.x * self.angle.sin()
  }
}

/// Axis-aligned box SDF sampler.
#[derive(Clone, Debug)]
pub struct BoxSampler {
  pub center: Vec3,
  pub half_extents: Vec3,
}

impl BoxSampler {
  pub fn new(half_extents: Vec3) -> Self {
    Self {
      center: Vec3::ZERO,
      half_extents,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl DensitySampler for BoxSampler {
  fn sample_density(&self, position: Vec3) -> f32 {
    let q = (position - self.center).abs() - self.half_extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
  }
}

/// Union of two samplers (minimum of both densities).
#[derive(Clone, Debug)]
pub struct UnionSampler<A, B> {
  pub a: A,
  pub b: B,
}

impl<A, B> UnionSampler<A, B> {
  pub fn new(a: A, b: B) -> Self {
    Self { a, b }
  }
}

impl<A: DensitySampler, B: DensitySampler> DensitySampler for UnionSampler<A, B> {
  #[inline]
  fn sample_density(&self, position: Vec3) -> f32 {
    self.a.sample_density(position).min(self.b.sample_density(position))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sphere_sign_convention() {
    let sphere = SphereSampler::new(10.0).with_center(Vec3::new(5.0, 0.0, 0.0));
    assert!(sphere.sample_density(Vec3::new(5.0, 0.0, 0.0)) < 0.0);
    assert!(sphere.sample_density(Vec3::new(20.0, 0.0, 0.0)) > 0.0);
    assert!(sphere.sample_density(Vec3::new(15.0, 0.0, 0.0)).abs() < 1e-5);
  }

  #[test]
  fn rippled_sphere_stays_near_radius() {
    let sampler = RippledSphereSampler::new(50.0, 2.0, 0.1);
    assert!(sampler.sample_density(Vec3::ZERO) < 0.0);
    assert!(sampler.sample_density(Vec3::new(60.0, 0.0, 0.0)) > 0.0);
    // Ripple is zero on the axes, so the axis crossing is exact
    assert!(sampler.sample_density(Vec3::new(50.0, 0.0, 0.0)).abs() < 1e-4);
  }

  #[test]
  fn ground_plane_solid_below() {
    let plane = GroundPlaneSampler::new(3.0);
    assert!(plane.sample_density(Vec3::new(100.0, 2.0, -7.0)) < 0.0);
    assert!(plane.sample_density(Vec3::new(0.0, 4.0, 0.0)) > 0.0);
  }

  #[test]
  fn tilted_plane_passes_through_origin() {
    let plane = TiltedPlaneSampler::new();
    assert!(plane.sample_density(Vec3::ZERO).abs() < 1e-6);
    assert!(plane.sample_density(Vec3::new(0.0, 1.0, 0.0)) > 0.0);
    assert!(plane.sample_density(Vec3::new(1.0, 0.0, 0.0)) < 0.0);
  }

  #[test]
  fn union_takes_nearest_surface() {
    let union = UnionSampler::new(
      SphereSampler::new(2.0),
      SphereSampler::new(2.0).with_center(Vec3::new(10.0, 0.0, 0.0)),
    );
    assert!(union.sample_density(Vec3::ZERO) < 0.0);
    assert!(union.sample_density(Vec3::new(10.0, 0.0, 0.0)) < 0.0);
    assert!(union.sample_density(Vec3::new(5.0, 0.0, 0.0)) > 0.0);
  }

  #[test]
  fn box_inside_and_outside() {
    let b = BoxSampler::new(Vec3::splat(2.0)).with_center(Vec3::splat(1.0));
    assert!(b.sample_density(Vec3::splat(1.0)) < 0.0);
    assert!((b.sample_density(Vec3::new(6.0, 1.0, 1.0)) - 3.0).abs() < 1e-5);
  }
}
