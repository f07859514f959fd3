//! Chunk - one mesh for a fixed cubic region of the world.
//!
//! # Generation
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. Sample (R + 3)³ densities, two voxels of negative padding │
//! │ 2. No sign change anywhere? → generated, empty mesh, false   │
//! │ 3. Extract cells [2, R + 2) with Surface Nets                │
//! │ 4. Planar UVs from the chunk's local bounding box            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The padding lets boundary vertices and their central-difference normals
//! come from the same world samples a neighbouring chunk reads, so chunks
//! tile without cracks or lighting seams.
//!
//! Generation is split into [`Chunk::begin_generation`] (claims the chunk and
//! hands out a self-contained [`ChunkJob`]) and [`Chunk::finish_generation`]
//! (installs the result), so the expensive middle can run on any thread.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;
use tracing::{trace, warn};

use crate::constants::{padded_size, PADDING};
use crate::density::{DensityField, DensitySampler};
use crate::surface_nets;
use crate::types::{ExtractionBounds, Mesh, MinMaxAABB};

/// Atomic counter for generating unique ChunkIds.
static CHUNK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque chunk identifier.
///
/// Generated atomically - guaranteed unique within process lifetime, so a
/// renderer can cache GPU buffers by it across LOD updates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ChunkId(u64);

impl ChunkId {
  /// Generate a new unique ChunkId.
  pub fn new() -> Self {
    Self(CHUNK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Get the raw ID value.
  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for ChunkId {
  fn default() -> Self {
    Self::new()
  }
}

#[derive(Debug)]
pub struct Chunk {
  id: ChunkId,
  position: Vec3,
  size: f32,
  lod_level: u32,
  resolution: u32,
  mesh: Mesh,
  generated: bool,
  generating: bool,
}

impl Chunk {
  /// New ungenerated chunk centred on `position` with edge length `size`.
  ///
  /// `resolution` is voxels per axis (unpadded); zero is raised to one.
  pub fn new(position: Vec3, size: f32, lod_level: u32, resolution: u32) -> Self {
    Self {
      id: ChunkId::new(),
      position,
      size,
      lod_level,
      resolution: resolution.max(1),
      mesh: Mesh::new(),
      generated: false,
      generating: false,
    }
  }

  #[inline]
  pub fn id(&self) -> ChunkId {
    self.id
  }

  /// Centre of the chunk.
  #[inline]
  pub fn position(&self) -> Vec3 {
    self.position
  }

  #[inline]
  pub fn size(&self) -> f32 {
    self.size
  }

  #[inline]
  pub fn lod_level(&self) -> u32 {
    self.lod_level
  }

  #[inline]
  pub fn resolution(&self) -> u32 {
    self.resolution
  }

  #[inline]
  pub fn voxel_size(&self) -> f32 {
    self.size / self.resolution as f32
  }

  #[inline]
  pub fn mesh(&self) -> &Mesh {
    &self.mesh
  }

  #[inline]
  pub fn is_generated(&self) -> bool {
    self.generated
  }

  #[inline]
  pub fn is_generating(&self) -> bool {
    self.generating
  }

  /// Ready to hand to [`Chunk::begin_generation`].
  #[inline]
  pub fn needs_generation(&self) -> bool {
    !self.generated && !self.generating
  }

  pub fn bounds(&self) -> MinMaxAABB {
    MinMaxAABB::from_center_size(self.position, self.size)
  }

  /// Generate the mesh synchronously on the calling thread.
  ///
  /// Returns true when geometry was produced. A missing sampler, or a chunk
  /// that is already generated or generating, is a no-op returning false.
  pub fn generate_mesh<S: DensitySampler + ?Sized>(&mut self, sampler: Option<&S>) -> bool {
    let Some(sampler) = sampler else {
      warn!(chunk = self.id.raw(), "chunk generation requested without a density sampler");
      return false;
    };
    let Some(job) = self.begin_generation() else {
      return false;
    };
    let result = job.run(sampler);
    self.finish_generation(result) && !self.mesh.is_empty()
  }

  /// Claim the chunk for generation and describe the work.
  ///
  /// Returns `None` when generation already started or finished, so each
  /// chunk is dispatched at most once.
  pub fn begin_generation(&mut self) -> Option<ChunkJob> {
    if !self.needs_generation() {
      warn!(
        chunk = self.id.raw(),
        generated = self.generated,
        generating = self.generating,
        "duplicate chunk generation request ignored"
      );
      return None;
    }
    self.generating = true;
    Some(ChunkJob {
      chunk_id: self.id,
      min: self.position - Vec3::splat(self.size * 0.5),
      size: self.size,
      resolution: self.resolution,
    })
  }

  /// Install a finished job's mesh.
  ///
  /// Returns false (and discards the result) when it belongs to another chunk
  /// or this chunk is not waiting for one.
  pub fn finish_generation(&mut self, result: ChunkMeshResult) -> bool {
    if result.chunk_id != self.id || !self.generating {
      trace!(
        chunk = self.id.raw(),
        result_chunk = result.chunk_id.raw(),
        "discarding mismatched chunk result"
      );
      return false;
    }
    self.mesh = result.mesh;
    self.generating = false;
    self.generated = true;
    true
  }
}

/// Everything needed to mesh one chunk, detached from the chunk itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkJob {
  pub chunk_id: ChunkId,
  /// Minimum corner of the chunk (unpadded).
  pub min: Vec3,
  pub size: f32,
  pub resolution: u32,
}

impl ChunkJob {
  #[inline]
  pub fn voxel_size(&self) -> f32 {
    self.size / self.resolution as f32
  }

  /// Sample the padded lattice and extract the chunk's surface.
  #[tracing::instrument(level = "trace", skip_all, fields(chunk = self.chunk_id.raw()))]
  pub fn run<S: DensitySampler + ?Sized>(&self, sampler: &S) -> ChunkMeshResult {
    let voxel_size = self.voxel_size();
    let origin = self.min - Vec3::splat(voxel_size * PADDING as f32);

    let field = match DensityField::sample(sampler, padded_size(self.resolution), origin, voxel_size)
    {
      Ok(field) => field,
      Err(err) => {
        warn!(chunk = self.chunk_id.raw(), %err, "failed to build chunk density field");
        return self.empty_result();
      }
    };

    if !field.has_surface() {
      return self.empty_result();
    }

    let owned = ExtractionBounds::uniform(PADDING, PADDING + self.resolution as usize);
    let mut mesh = surface_nets::generate(&field, Some(owned));
    mesh.uvs = mesh
      .vertices
      .iter()
      .map(|&v| ((v - self.min) / self.size).truncate())
      .collect();

    ChunkMeshResult {
      chunk_id: self.chunk_id,
      mesh,
    }
  }

  fn empty_result(&self) -> ChunkMeshResult {
    ChunkMeshResult {
      chunk_id: self.chunk_id,
      mesh: Mesh::new(),
    }
  }
}

/// Output of a [`ChunkJob`].
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMeshResult {
  pub chunk_id: ChunkId,
  pub mesh: Mesh,
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
