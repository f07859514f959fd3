//! PlanetWorld - isolated planet container.
//!
//! Each world owns its octree, chunk task queue, sampler and transform, and
//! gates LOD updates to a fixed interval instead of the render frame rate.
//! Multiple worlds can exist independently (planets, moons, test dioramas).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::{DAffine3, DVec3};
use tracing::debug;
use web_time::Instant;

use crate::density::DensitySampler;
use crate::metrics::TimingMetrics;
use crate::octree::{ActiveChunk, ConfigError, OctreeSettings, OctreeTree, RefinementStats};
use crate::task_queue::{ChunkTaskQueue, CollectStats};

// =============================================================================
// WorldId - unique identifier
// =============================================================================

/// Atomic counter for generating unique WorldIds.
static WORLD_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque world identifier.
///
/// Generated atomically - guaranteed unique within process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WorldId(u64);

impl WorldId {
    /// Generate a new unique WorldId.
    pub fn new() -> Self {
        Self(WORLD_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TickOutcome
// =============================================================================

/// What a single [`PlanetWorld::tick`] did.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Present when the gate let a LOD update through.
    pub lod_update: Option<RefinementStats>,
    /// Chunk jobs spawned this tick.
    pub dispatched: usize,
    /// Completions installed or discarded this tick.
    pub collected: CollectStats,
}

impl TickOutcome {
    #[inline]
    pub fn updated(&self) -> bool {
        self.lod_update.is_some()
    }
}

// =============================================================================
// PlanetWorld<S> - per-world state container
// =============================================================================

/// Per-world planet state container, generic over sampler.
///
/// `S` may be unsized, so hosts that pick the density function at runtime can
/// use `PlanetWorld<dyn DensitySampler>` through [`PlanetWorld::from_shared`].
///
/// # Transform
///
/// The `transform` field positions the planet in global space. [`tick`]
/// takes a global viewer position and converts it with `viewer_to_local`;
/// renderers place chunks with `local_to_world`.
///
/// [`tick`]: PlanetWorld::tick
pub struct PlanetWorld<S: DensitySampler + ?Sized + 'static> {
    /// Unique world identifier.
    pub id: WorldId,

    /// World-space transform (position, rotation, scale).
    /// Converts from local octree space to global world space.
    pub transform: DAffine3,

    tree: OctreeTree,
    queue: ChunkTaskQueue,
    sampler: Arc<S>,

    /// Seconds accumulated since the gate last fired.
    update_timer: f64,
    /// Local viewer position of the last LOD update.
    last_update_viewer: Option<DVec3>,
    /// The last LOD update changed nothing.
    converged: bool,

    timings: TimingMetrics,
}

impl<S: DensitySampler + 'static> PlanetWorld<S> {
    /// Create a world with identity transform, its tree centred on the origin.
    pub fn new(settings: OctreeSettings, sampler: S) -> Result<Self, ConfigError> {
        Self::from_shared(settings, Arc::new(sampler))
    }
}

impl<S: DensitySampler + ?Sized + 'static> PlanetWorld<S> {
    /// Create a world around a sampler that may be shared with other worlds.
    pub fn from_shared(settings: OctreeSettings, sampler: Arc<S>) -> Result<Self, ConfigError> {
        Self::with_origin(settings, DVec3::ZERO, sampler)
    }

    /// Create a world whose root node is centred on `origin` (local space).
    pub fn with_origin(
        settings: OctreeSettings,
        origin: DVec3,
        sampler: Arc<S>,
    ) -> Result<Self, ConfigError> {
        let tree = OctreeTree::with_origin(settings, origin)?;
        Ok(Self {
            id: WorldId::new(),
            transform: DAffine3::IDENTITY,
            tree,
            queue: ChunkTaskQueue::new(),
            sampler,
            update_timer: 0.0,
            last_update_viewer: None,
            converged: false,
            timings: TimingMetrics::new(),
        })
    }

    /// Set the world transform.
    pub fn set_transform(&mut self, transform: DAffine3) {
        self.transform = transform;
    }

    /// Convert a global position to local octree space.
    #[inline]
    pub fn viewer_to_local(&self, global_pos: DVec3) -> DVec3 {
        self.transform.inverse().transform_point3(global_pos)
    }

    /// Convert a local octree position to global world space.
    #[inline]
    pub fn local_to_world(&self, local_pos: DVec3) -> DVec3 {
        self.transform.transform_point3(local_pos)
    }

    /// Advance the world by `dt` seconds with the viewer at `global_viewer`.
    ///
    /// The first tick always updates LOD. Afterwards an update runs when
    /// `update_interval` has accumulated and either the viewer has moved more
    /// than `min_viewer_movement` since the last update or the last update
    /// still changed the tree. Each update refines one level, so a viewer
    /// standing still keeps refining until the tree settles. The timer
    /// restarts whenever the interval elapses. Chunk jobs are dispatched and
    /// finished ones collected every tick.
    pub fn tick(&mut self, dt: f64, global_viewer: DVec3) -> TickOutcome {
        let viewer = self.viewer_to_local(global_viewer);
        let mut outcome = TickOutcome::default();

        if self.gate(dt, viewer) {
            let start = Instant::now();
            let stats = self.tree.update_lod(viewer);
            self.timings
                .record_update(start.elapsed().as_micros() as u64, &stats);
            self.last_update_viewer = Some(viewer);
            self.converged = stats.is_structurally_stable();
            outcome.lod_update = Some(stats);
        }

        outcome.dispatched = self.queue.dispatch(&mut self.tree, &self.sampler);
        outcome.collected = self.queue.collect(&mut self.tree);
        self.record_collected(&outcome.collected);
        outcome
    }

    /// Force a LOD update now, bypassing the gate.
    pub fn update_now(&mut self, global_viewer: DVec3) -> RefinementStats {
        let viewer = self.viewer_to_local(global_viewer);
        self.update_timer = 0.0;
        self.last_update_viewer = Some(viewer);
        let stats = self.tree.update_lod(viewer);
        self.converged = stats.is_structurally_stable();
        stats
    }

    fn gate(&mut self, dt: f64, viewer: DVec3) -> bool {
        let Some(last) = self.last_update_viewer else {
            self.update_timer = 0.0;
            return true;
        };

        self.update_timer += dt.max(0.0);
        if self.update_timer < self.tree.settings().update_interval {
            return false;
        }
        self.update_timer = 0.0;
        !self.converged || viewer.distance(last) > self.tree.settings().min_viewer_movement
    }

    fn record_collected(&mut self, collected: &CollectStats) {
        for &timing in &collected.mesh_times_us {
            self.timings.record_mesh_timing(timing);
        }
        self.timings.record_installed(collected.installed);
    }

    /// Block until every dispatched chunk job is back and installed.
    pub fn wait_idle(&mut self) -> CollectStats {
        let collected = self.queue.wait_idle(&mut self.tree);
        self.record_collected(&collected);
        collected
    }

    /// Drain outstanding jobs and reset the tree to a single root.
    pub fn shutdown(&mut self) {
        let collected = self.wait_idle();
        self.tree.initialize();
        self.last_update_viewer = None;
        self.converged = false;
        self.update_timer = 0.0;
        debug!(
            world = self.id.raw(),
            discarded = collected.discarded,
            "planet world shut down"
        );
    }

    /// Replace the settings, rebuilding the tree from a single root.
    pub fn reconfigure(&mut self, settings: OctreeSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.wait_idle();
        self.tree.reinitialize(settings)?;
        self.last_update_viewer = None;
        self.converged = false;
        self.update_timer = 0.0;
        Ok(())
    }

    /// Generated chunks on active leaves: the geometry to render.
    pub fn active_chunks(&self) -> Vec<ActiveChunk<'_>> {
        self.tree.active_chunks()
    }

    /// Number of generated chunks on active leaves.
    #[inline]
    pub fn active_chunk_count(&self) -> usize {
        self.tree.active_chunk_count()
    }

    #[inline]
    pub fn tree(&self) -> &OctreeTree {
        &self.tree
    }

    #[inline]
    pub fn settings(&self) -> &OctreeSettings {
        self.tree.settings()
    }

    #[inline]
    pub fn sampler(&self) -> &Arc<S> {
        &self.sampler
    }

    #[inline]
    pub fn queue(&self) -> &ChunkTaskQueue {
        &self.queue
    }

    #[inline]
    pub fn timings(&self) -> &TimingMetrics {
        &self.timings
    }

    /// True once an LOD update left the tree unchanged.
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Local viewer position of the last LOD update, if any.
    #[inline]
    pub fn last_update_viewer(&self) -> Option<DVec3> {
        self.last_update_viewer
    }
}

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;
