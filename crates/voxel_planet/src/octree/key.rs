//! OctreeKey - immutable value type identifying a cell of the octree.
//!
//! Keys are identified by their grid coordinates at their level.
//! Level 0 = finest detail (smallest cells), higher level = coarser.

use glam::IVec3;

/// Octree key - immutable value type.
///
/// Grid coordinates are at the key's own level, not the finest level.
/// This keeps parent/child calculations to a shift and an offset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OctreeKey {
  /// Level of detail (0 = finest, higher = coarser)
  pub level: i32,
  /// Grid position at this key's level
  pub coords: IVec3,
}

impl OctreeKey {
  /// Create a new key at the given level and position.
  pub fn new(level: i32, coords: IVec3) -> Self {
    Self { level, coords }
  }

  /// The root key of a tree `max_depth` levels deep.
  pub fn root(max_depth: u32) -> Self {
    Self::new(max_depth as i32, IVec3::ZERO)
  }

  /// Unit offset of an octant.
  ///
  /// Octant: 0-7 where bits represent +X, +Y, +Z offsets:
  /// - bit 0: X offset (0 or 1)
  /// - bit 1: Y offset (0 or 1)
  /// - bit 2: Z offset (0 or 1)
  #[inline]
  pub fn octant_offset(octant: u8) -> IVec3 {
    IVec3::new(
      (octant & 1) as i32,
      ((octant >> 1) & 1) as i32,
      ((octant >> 2) & 1) as i32,
    )
  }

  /// Get child key (finer detail: level - 1).
  ///
  /// Returns None if already at level 0 (cannot subdivide further).
  pub fn child(&self, octant: u8) -> Option<Self> {
    if self.level <= 0 {
      return None;
    }
    Some(Self {
      level: self.level - 1,
      coords: self.coords * 2 + Self::octant_offset(octant),
    })
  }

  /// All 8 children in octant order, or None at level 0.
  pub fn children(&self) -> Option<[Self; 8]> {
    if self.level <= 0 {
      return None;
    }
    let level = self.level - 1;
    let base = self.coords * 2;
    Some(std::array::from_fn(|octant| Self {
      level,
      coords: base + Self::octant_offset(octant as u8),
    }))
  }

  /// Get parent key (coarser: level + 1).
  ///
  /// Uses an arithmetic shift, so negative coordinates floor toward the
  /// parent cell that actually contains them.
  pub fn parent(&self) -> Self {
    Self {
      level: self.level + 1,
      coords: self.coords >> 1,
    }
  }

  /// This key's octant within its parent.
  #[inline]
  pub fn octant(&self) -> u8 {
    let bits = self.coords & IVec3::ONE;
    (bits.x | (bits.y << 1) | (bits.z << 2)) as u8
  }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
