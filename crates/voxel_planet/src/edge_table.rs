//! Cube edge topology and the corner-mask → edge-mask lookup table.
//!
//! # Cube Topology
//!
//! ```text
//!       6──────7         Corners (binary ZYX):
//!      /│     /│           0=(0,0,0)  1=(1,0,0)  2=(0,1,0)  3=(1,1,0)
//!     4─┼────5 │           4=(0,0,1)  5=(1,0,1)  6=(0,1,1)  7=(1,1,1)
//!     │ 2────┼─3
//!     │/     │/          +Y
//!     0──────1            │  +Z
//!                         │ /
//!                         └───+X
//! ```
//!
//! A corner mask has bit `i` set when corner `i` is interior (negative
//! density). `EDGE_TABLE[mask]` has bit `e` set when edge `e` joins an
//! interior corner to an exterior one.

/// Edge endpoint corner indices, ordered by first corner.
pub const EDGE_CORNERS: [[u8; 2]; 12] = [
  [0, 1], // Edge 0:  X axis at Y=0, Z=0
  [0, 2], // Edge 1:  Y axis at X=0, Z=0
  [0, 4], // Edge 2:  Z axis at X=0, Y=0
  [1, 3], // Edge 3:  Y axis at X=1, Z=0
  [1, 5], // Edge 4:  Z axis at X=1, Y=0
  [2, 3], // Edge 5:  X axis at Y=1, Z=0
  [2, 6], // Edge 6:  Z axis at X=0, Y=1
  [3, 7], // Edge 7:  Z axis at X=1, Y=1
  [4, 5], // Edge 8:  X axis at Y=0, Z=1
  [4, 6], // Edge 9:  Y axis at X=0, Z=1
  [5, 7], // Edge 10: Y axis at X=1, Z=1
  [6, 7], // Edge 11: X axis at Y=1, Z=1
];

/// Axis (0 = X, 1 = Y, 2 = Z) each edge runs along.
pub const EDGE_AXIS: [u8; 12] = generate_edge_axes();

/// Precomputed edge table.
/// Index: 8-bit corner mask (which corners are interior)
/// Value: 12-bit edge mask (which edges have crossings)
pub const EDGE_TABLE: [u16; 256] = generate_edge_table();

const fn generate_edge_axes() -> [u8; 12] {
  let mut axes = [0u8; 12];
  let mut edge = 0;
  while edge < 12 {
    // Corner indices differ in exactly one bit; that bit is the axis.
    let diff = EDGE_CORNERS[edge][0] ^ EDGE_CORNERS[edge][1];
    axes[edge] = diff.trailing_zeros() as u8;
    edge += 1;
  }
  axes
}

const fn generate_edge_table() -> [u16; 256] {
  let mut table = [0u16; 256];
  let mut corner_mask = 0usize;

  while corner_mask < 256 {
    let mut edge_mask = 0u16;
    let mut edge = 0;

    while edge < 12 {
      let c0 = EDGE_CORNERS[edge][0] as usize;
      let c1 = EDGE_CORNERS[edge][1] as usize;

      if (corner_mask >> c0) & 1 != (corner_mask >> c1) & 1 {
        edge_mask |= 1 << edge;
      }

      edge += 1;
    }

    table[corner_mask] = edge_mask;
    corner_mask += 1;
  }

  table
}

/// Iterate the edges of a cell that cross the surface, as corner pairs.
#[inline]
pub fn crossing_edges(corner_mask: u8) -> impl Iterator<Item = [u8; 2]> {
  let edge_mask = EDGE_TABLE[corner_mask as usize];
  (0..12usize)
    .filter(move |edge| edge_mask & (1 << edge) != 0)
    .map(|edge| EDGE_CORNERS[edge])
}

/// Get corner position within unit cube.
#[inline(always)]
pub const fn corner_position(corner: u8) -> [f32; 3] {
  [
    (corner & 1) as f32,
    ((corner >> 1) & 1) as f32,
    ((corner >> 2) & 1) as f32,
  ]
}

#[cfg(test)]
#[path = "edge_table_test.rs"]
mod edge_table_test;
