//! Naive Surface Nets meshing algorithm.
//!
//! Converts a [`DensityField`] into a triangle mesh. Pure function: no side
//! effects, deterministic, safe to call concurrently on distinct fields.
//!
//! # Algorithm Overview
//!
//! Surface Nets is a dual method that generates ONE vertex per cell
//! containing a surface crossing, placing it at the centroid of all edge
//! crossings, then connects the vertices of the 4 cells around every
//! crossing lattice edge into a quad.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  field: DensityField     - N³ f32 samples (negative = solid)    │
//! │  bounds: [min, max)      - cells allowed to own geometry        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 PHASE A: Vertex Estimation                      │
//! │  For each cell in bounds:                                       │
//! │    Load 8 corner densities, build 8-bit corner mask             │
//! │    Skip homogeneous cells (mask == 0 or mask == 255)            │
//! │    Position: centroid of edge crossings (t clamped to [0,1])    │
//! │    Normal: normalized density gradient at the cell base corner  │
//! │    Record vertex index in the cell slot grid                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 PHASE B: Quadrangulation                        │
//! │  For each cell p in bounds and axis a (b, c = the other two):   │
//! │    Edge p → p+a crosses?   (sign(d(p)) != sign(d(p+a)))         │
//! │    Quad cells: p, p-b, p-c, p-b-c                               │
//! │    Cells below bounds (apron) get vertices on demand            │
//! │    Skip the quad if any of the 4 cells has no vertex            │
//! │    Emit 2 triangles, wound CCW seen from the exterior           │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        OUTPUT                                   │
//! │  Mesh { vertices, indices, normals }  (world space)             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Edge Ownership
//!
//! Every lattice edge belongs to the cell at its base sample. Restricting
//! ownership to the bounds means two extractions whose bounds tile space
//! emit each quad exactly once, while the apron vertices they share are
//! computed from identical samples, so the results meet without cracks.
//!
//! ```text
//!   chunk A cells      │  chunk B cells
//!   ... [R-1] [ R ]    │  [ 1 ] [ 2 ] ...
//!                      │
//!   B's apron cell 0 ──┘  covers the same samples as A's cell R
//! ```

mod corner_mask;
mod gradient;
mod vertex_calc;

pub use gradient::FALLBACK_NORMAL;

use glam::Vec3A;

use crate::density::DensityField;
use crate::types::{ExtractionBounds, Mesh};

/// Vertex state of one lattice cell during extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellSlot {
  Unvisited,
  /// Homogeneous cell, or a cell that does not exist in the lattice.
  Empty,
  Vertex(u32),
}

/// Per-extraction scratch state: the slot grid and the mesh being built.
struct Extraction<'a> {
  field: &'a DensityField,
  slots: Vec<CellSlot>,
  mesh: Mesh,
}

impl<'a> Extraction<'a> {
  fn new(field: &'a DensityField) -> Self {
    let n = field.size();
    Self {
      field,
      slots: vec![CellSlot::Unvisited; n * n * n],
      mesh: Mesh::new(),
    }
  }

  #[inline]
  fn slot_index(&self, cell: [usize; 3]) -> usize {
    let n = self.field.size();
    (cell[0] * n + cell[1]) * n + cell[2]
  }

  /// Vertex index of `cell`, creating it on first visit.
  fn vertex(&mut self, cell: [usize; 3]) -> Option<u32> {
    let cells = self.field.size() - 1;
    if cell.iter().any(|&c| c >= cells) {
      return None;
    }

    let slot = self.slot_index(cell);
    match self.slots[slot] {
      CellSlot::Vertex(index) => return Some(index),
      CellSlot::Empty => return None,
      CellSlot::Unvisited => {}
    }

    let corners = self.field.cell_corners(cell);
    let mask = corner_mask::build(&corners);
    if corner_mask::is_homogeneous(mask) {
      self.slots[slot] = CellSlot::Empty;
      return None;
    }

    let offset = vertex_calc::compute_offset(&corners, mask);
    let lattice = Vec3A::new(cell[0] as f32, cell[1] as f32, cell[2] as f32) + offset;
    let position = self.field.world_position(lattice.into());
    let normal = gradient::vertex_normal(self.field, cell, &corners);

    let index = self.mesh.vertices.len() as u32;
    self.mesh.vertices.push(position);
    self.mesh.normals.push(normal);
    self.slots[slot] = CellSlot::Vertex(index);
    Some(index)
  }

  /// Emit the quad around the edge from `p` along `axis`, if it crosses.
  fn emit_quad(&mut self, p: [usize; 3], axis: usize) {
    let b = (axis + 1) % 3;
    let c = (axis + 2) % 3;
    if p[b] == 0 || p[c] == 0 {
      return;
    }

    let mut q = p;
    q[axis] += 1;
    let d0 = self.field.density_at(p);
    let d1 = self.field.density_at(q);
    let inside0 = d0 < 0.0;
    if inside0 == (d1 < 0.0) {
      return;
    }

    let mut pb = p;
    pb[b] -= 1;
    let mut pc = p;
    pc[c] -= 1;
    let mut pbc = pb;
    pbc[c] -= 1;

    let (Some(v0), Some(v1), Some(v2), Some(v3)) = (
      self.vertex(p),
      self.vertex(pb),
      self.vertex(pc),
      self.vertex(pbc),
    ) else {
      return;
    };

    // e_b × e_c = e_a, so (v0, v1, v3) faces +a.
    let quad = if inside0 {
      [v0, v1, v3, v0, v3, v2]
    } else {
      [v0, v3, v1, v0, v2, v3]
    };
    self.mesh.indices.extend_from_slice(&quad);
  }
}

/// Generate a mesh from a density field using Naive Surface Nets.
///
/// # Arguments
///
/// * `field` - density lattice (negative = solid)
/// * `bounds` - cells `[min, max)` that own vertices and faces; `None` uses
///   [`ExtractionBounds::full`]
///
/// # Returns
///
/// A world-space mesh with one outward unit normal per vertex. Faces are
/// counter-clockwise seen from the exterior. Empty when the field has no
/// sign change inside the bounds.
#[tracing::instrument(level = "trace", skip_all, fields(size = field.size()))]
pub fn generate(field: &DensityField, bounds: Option<ExtractionBounds>) -> Mesh {
  let bounds = bounds
    .unwrap_or_else(|| ExtractionBounds::full(field.size()))
    .clamped(field.size());
  if bounds.is_empty() {
    return Mesh::new();
  }

  let mut extraction = Extraction::new(field);

  // Phase A: one vertex per surface cell in bounds.
  for x in bounds.min[0]..bounds.max[0] {
    for y in bounds.min[1]..bounds.max[1] {
      for z in bounds.min[2]..bounds.max[2] {
        extraction.vertex([x, y, z]);
      }
    }
  }

  // Phase B: quads for every crossing edge owned by a cell in bounds.
  for x in bounds.min[0]..bounds.max[0] {
    for y in bounds.min[1]..bounds.max[1] {
      for z in bounds.min[2]..bounds.max[2] {
        for axis in 0..3 {
          extraction.emit_quad([x, y, z], axis);
        }
      }
    }
  }

  extraction.mesh
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
