//! Octree module for LOD-based spatial subdivision.
//!
//! The tree is an arena of [`OctreeNode`]s linked by index. Each active leaf
//! owns at most one [`Chunk`](crate::chunk::Chunk); internal nodes never
//! hold mesh data, so memory follows the current leaf frontier.
//!
//! # LOD Convention
//!
//! Level 0 = finest detail (smallest nodes), higher level = coarser.
//!
//! ```text
//! Node Size = root_size / 2^(max_depth - level)
//! ```
//!
//! # Module Structure
//!
//! - [`key`]: `OctreeKey` - (level, coords) identity with parent/child math
//! - [`node`]: `OctreeNode` - arena slot (leaf / internal / vacant)
//! - [`config`]: `OctreeSettings` - LOD thresholds and coordinate math
//! - [`transition`]: `TransitionGroup` - recorded subdivide/merge
//! - [`stats`]: `RefinementStats` - counters from one LOD update
//! - [`bounds`]: `DAabb3` - f64 node extents
//! - [`tree`]: `OctreeTree` - the arena, key map and update loop

pub mod bounds;
pub mod config;
pub mod key;
pub mod node;
pub mod stats;
pub mod transition;
pub mod tree;

// Re-exports
pub use bounds::DAabb3;
pub use config::{ConfigError, OctreeSettings};
pub use key::OctreeKey;
pub use node::{NodeKind, OctreeNode};
pub use stats::RefinementStats;
pub use transition::{TransitionGroup, TransitionType};
pub use tree::{ActiveChunk, ChunkTask, OctreeTree};
