//! Corner mask computation.
//!
//! The corner mask is an 8-bit value where each bit indicates whether a corner
//! of the 2x2x2 cell is inside the surface (negative density).

/// Build corner mask from the 8 corner densities of a cell.
///
/// Each bit in the result corresponds to one corner:
/// - Bit 0: corner (0,0,0)
/// - Bit 1: corner (1,0,0)
/// - Bit 2: corner (0,1,0)
/// - Bit 3: corner (1,1,0)
/// - Bit 4: corner (0,0,1)
/// - Bit 5: corner (1,0,1)
/// - Bit 6: corner (0,1,1)
/// - Bit 7: corner (1,1,1)
///
/// A bit is set if the corresponding sample is negative. Zero is exterior.
#[inline]
pub fn build(samples: &[f32; 8]) -> u8 {
  samples
    .iter()
    .enumerate()
    .fold(0u8, |mask, (i, &d)| mask | (((d < 0.0) as u8) << i))
}

/// True when every corner has the same sign (no surface in the cell).
#[inline(always)]
pub fn is_homogeneous(mask: u8) -> bool {
  mask == 0 || mask == u8::MAX
}

#[cfg(test)]
#[path = "corner_mask_test.rs"]
mod corner_mask_test;
