//! Lattice layout constants for padded chunk density fields.
//!
//! A chunk of `R` voxels per axis is sampled on an `(R + 3)³` lattice: two
//! samples of padding on the negative side and the `R + 1` samples that bound
//! the chunk's own `R` cells.
//!
//! # Padded Lattice Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PADDED LATTICE (R = 16)                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Sample index:  0     1     2    ...    17    18                        │
//! │                 │     │     │           │     │                         │
//! │                 │     │     └─ 16 owned ┘     │                         │
//! │                 │     │       (cells 2-17)    └─ chunk max face         │
//! │                 │     └─ apron cell                                     │
//! │                 └─ gradient stencil for the apron cell                  │
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  [0]        Left neighbour of the apron cell's base sample              │
//! │  [1]        Apron cell - same samples as the neighbour's last cell      │
//! │  [2-17]     Owned cell origins (cells that emit faces)                  │
//! │  [18]       Last sample needed by cell 17 (+1 corner)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every cell that can carry a vertex (apron or owned) has both lattice
//! neighbours of its base sample, so its normal is a true central
//! difference and matches the normal the adjacent chunk computes.
//!
//! # Memory Layout
//!
//! ```text
//! index = (x * N + y) * N + z
//!
//! X is the major axis, Z is the minor axis.
//! ```
//!
//! # Cell Corners
//!
//! ```text
//! Cell corner indices (binary: ZYX):
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```

/// Samples of padding on the negative side of every axis.
pub const PADDING: usize = 2;

/// Default voxels per chunk axis (unpadded).
pub const DEFAULT_CHUNK_RESOLUTION: u32 = 16;

/// Samples per axis of a padded lattice for a given resolution.
///
/// The `+1` is the far corner of the last owned cell; it doubles as the
/// positive gradient neighbour of that cell's base sample.
#[inline(always)]
pub const fn padded_size(resolution: u32) -> usize {
  resolution as usize + PADDING + 1
}

/// Density returned for lattice queries outside the field.
///
/// Positive, so missing samples read as exterior.
pub const OUT_OF_RANGE_DENSITY: f32 = 1.0;

/// Convert 3D lattice coordinates to a linear index.
#[inline(always)]
pub const fn lattice_index(x: usize, y: usize, z: usize, size: usize) -> usize {
  (x * size + y) * size + z
}

/// Convert a linear index back to 3D lattice coordinates.
#[inline(always)]
pub const fn lattice_coord(idx: usize, size: usize) -> [usize; 3] {
  let z = idx % size;
  let y = (idx / size) % size;
  let x = idx / (size * size);
  [x, y, z]
}

/// Lattice offsets of the 8 cube corners relative to a cell's base sample.
///
/// Corner layout (binary: ZYX):
/// - 0 = (0,0,0)
/// - 1 = (1,0,0)
/// - 2 = (0,1,0)
/// - 3 = (1,1,0)
/// - 4 = (0,0,1)
/// - 5 = (1,0,1)
/// - 6 = (0,1,1)
/// - 7 = (1,1,1)
pub const CORNER_OFFSETS: [[usize; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [0, 1, 0],
  [1, 1, 0],
  [0, 0, 1],
  [1, 0, 1],
  [0, 1, 1],
  [1, 1, 1],
];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
