//! voxel_planet - Framework/engine independent planet meshing with octree LOD
//!
//! This crate turns a signed density function into triangle meshes and keeps
//! the set of meshed chunks matched to a moving viewer. Negative density is
//! solid, zero and positive are empty.
//!
//! # Features
//!
//! - **Naive Surface Nets**: one vertex per surface cell at the centroid of
//!   its edge crossings, gradient normals, outward-facing winding
//! - **Seamless chunks**: one-sample padding and edge ownership by base cell,
//!   so neighbouring chunks at the same level share boundary vertices
//! - **Octree LOD**: distance-driven subdivide/merge with hysteresis, one
//!   level per update, arena storage with slot reuse
//! - **Background generation**: chunk jobs on the rayon pool, results routed
//!   back by key and discarded when their node is gone
//!
//! # Example
//!
//! ```ignore
//! use glam::{DVec3, Vec3};
//! use voxel_planet::{OctreeSettings, PlanetWorld};
//!
//! let settings = OctreeSettings::default().with_root_size(4000.0);
//! let mut world = PlanetWorld::new(settings, |p: Vec3| p.length() - 1500.0)?;
//!
//! // Once per frame; LOD updates are gated to `update_interval`.
//! world.tick(dt, DVec3::new(0.0, 1600.0, 0.0));
//!
//! for active in world.active_chunks() {
//!     println!("{:?}: {} triangles", active.key, active.chunk.mesh().triangle_count());
//! }
//! ```

pub mod constants;
pub mod edge_table;
pub mod types;

// Re-export commonly used items
pub use constants::{
  lattice_coord, lattice_index, padded_size, CORNER_OFFSETS, DEFAULT_CHUNK_RESOLUTION, PADDING,
};
pub use edge_table::{EDGE_CORNERS, EDGE_TABLE};
pub use types::{ExtractionBounds, Mesh, MinMaxAABB};

// Density sampling
pub mod density;
pub use density::{DensityField, DensityFieldError, DensitySampler};

// Analytic density functions
pub mod sdf_samplers;

// Surface Nets module
pub mod surface_nets;

// Chunks and their generation jobs
pub mod chunk;
pub use chunk::{Chunk, ChunkId, ChunkJob, ChunkMeshResult};

// Octree module for LOD-based spatial subdivision
pub mod octree;
pub use octree::{ConfigError, OctreeKey, OctreeNode, OctreeSettings, OctreeTree};

// Background chunk generation
pub mod task_queue;
pub use task_queue::{ChunkCompletion, ChunkTaskQueue, CollectStats};

// World isolation - multi-world support
pub mod world;
pub use world::{PlanetWorld, TickOutcome, WorldId};

pub mod metrics;
