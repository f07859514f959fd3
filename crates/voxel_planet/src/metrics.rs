//! Engine-agnostic metrics for planet LOD state.
//!
//! [`LodMetrics`] is a plain snapshot of an [`OctreeTree`] and costs one pass
//! over the arena. Timing windows in [`TimingMetrics`] are feature-gated and
//! runtime-toggled so recording is free when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use voxel_planet::metrics::{LodMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let snapshot = LodMetrics::collect(world.tree());
//! println!("{} of {} leaves meshed", snapshot.generated_chunks, snapshot.active_leaves);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::octree::{OctreeTree, RefinementStats};

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Smallest and largest value in the window.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.buffer.iter().copied().min()?;
        let max = self.buffer.iter().copied().max()?;
        Some((min, max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Snapshot of the tree's LOD distribution and mesh load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LodMetrics {
    /// Active leaves per level (index = level, 0 is finest).
    pub leaves_per_level: Vec<u32>,
    /// Live nodes in the arena, internal ones included.
    pub live_nodes: usize,
    /// Active leaves, each holding a chunk.
    pub active_leaves: usize,
    /// Active chunks holding a finished mesh.
    pub generated_chunks: usize,
    /// Active chunks with a job in flight.
    pub generating_chunks: usize,
    /// Active chunks waiting to be dispatched.
    pub pending_chunks: usize,
    pub total_vertices: u64,
    pub total_triangles: u64,
    /// Approximate mesh memory: positions, normals, uvs and indices.
    pub mesh_memory_bytes: u64,
}

impl LodMetrics {
    pub fn collect(tree: &OctreeTree) -> Self {
        let mut metrics = Self {
            leaves_per_level: vec![0; tree.settings().max_depth as usize + 1],
            ..Self::default()
        };

        for (_, node) in tree.nodes() {
            metrics.live_nodes += 1;
            if !node.is_active() {
                continue;
            }
            let Some(chunk) = node.chunk() else {
                continue;
            };

            if let Some(count) = metrics.leaves_per_level.get_mut(node.key().level as usize) {
                *count += 1;
            }
            metrics.active_leaves += 1;

            if chunk.is_generated() {
                metrics.generated_chunks += 1;
                let mesh = chunk.mesh();
                let vertices = mesh.vertices.len() as u64;
                let indices = mesh.indices.len() as u64;
                metrics.total_vertices += vertices;
                metrics.total_triangles += indices / 3;
                // Vec3 position + Vec3 normal + Vec2 uv, u32 index
                metrics.mesh_memory_bytes += vertices * 32 + indices * 4;
            } else if chunk.is_generating() {
                metrics.generating_chunks += 1;
            } else {
                metrics.pending_chunks += 1;
            }
        }
        metrics
    }

    pub fn total_leaves(&self) -> u32 {
        self.leaves_per_level.iter().sum()
    }

    pub fn mesh_memory_mb(&self) -> f64 {
        self.mesh_memory_bytes as f64 / 1_048_576.0
    }
}

/// Rolling timing history, recorded only when [`is_enabled`].
#[derive(Debug, Clone, Default)]
pub struct TimingMetrics {
    /// Chunk sampling + meshing times in microseconds.
    pub mesh_timings: RollingWindow<u64>,
    /// LOD update times in microseconds.
    pub update_timings: RollingWindow<u64>,
    pub last_mesh_us: u64,
    pub last_update_us: u64,
    /// Meshes installed this session.
    pub total_chunks_generated: u64,
    /// Structural transitions this session.
    pub total_transitions: u64,
}

impl TimingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mesh_timing(&mut self, timing_us: u64) {
        if is_enabled() {
            self.mesh_timings.push(timing_us);
            self.last_mesh_us = timing_us;
        }
    }

    pub fn record_update(&mut self, timing_us: u64, stats: &RefinementStats) {
        if is_enabled() {
            self.update_timings.push(timing_us);
            self.last_update_us = timing_us;
            self.total_transitions += stats.total_transitions() as u64;
        }
    }

    pub fn record_installed(&mut self, count: usize) {
        if is_enabled() {
            self.total_chunks_generated += count as u64;
        }
    }

    /// Clear the windows. Session totals are kept.
    pub fn reset(&mut self) {
        self.mesh_timings.clear();
        self.update_timings.clear();
        self.last_mesh_us = 0;
        self.last_update_us = 0;
    }

    pub fn avg_mesh_timing_us(&self) -> f64 {
        self.mesh_timings.average()
    }

    pub fn avg_update_timing_us(&self) -> f64 {
        self.update_timings.average()
    }
}
