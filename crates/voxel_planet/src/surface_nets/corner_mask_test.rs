use rand::Rng;

use super::*;

fn reference_scalar(samples: &[f32; 8]) -> u8 {
  let mut corner_mask = 0u8;
  for (i, &sample) in samples.iter().enumerate() {
    if sample < 0.0 {
      corner_mask |= 1 << i;
    }
  }
  corner_mask
}

#[test]
fn test_all_positive() {
  let samples = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
  assert_eq!(build(&samples), 0b00000000);
  assert!(is_homogeneous(build(&samples)));
}

#[test]
fn test_all_negative() {
  let samples = [-1.0, -2.0, -3.0, -4.0, -5.0, -6.0, -7.0, -8.0];
  assert_eq!(build(&samples), 0b11111111);
  assert!(is_homogeneous(build(&samples)));
}

#[test]
fn test_mixed() {
  // Corners 0, 2, 4, 6 negative (checkerboard pattern)
  let samples = [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0];
  assert_eq!(build(&samples), 0b01010101);
  assert!(!is_homogeneous(build(&samples)));
}

#[test]
fn test_first_corner_only() {
  let samples = [-1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
  assert_eq!(build(&samples), 0b00000001);
}

#[test]
fn test_last_corner_only() {
  let samples = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0];
  assert_eq!(build(&samples), 0b10000000);
}

#[test]
fn test_zero_is_exterior() {
  let samples = [0.0, -0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5];
  assert_eq!(build(&samples), 0b10000000);
}

#[test]
fn test_matches_reference() {
  let mut rng = rand::rng();
  for _ in 0..1000 {
    let samples: [f32; 8] = std::array::from_fn(|_| rng.random_range(-1.0..1.0));
    assert_eq!(build(&samples), reference_scalar(&samples));
  }
}
