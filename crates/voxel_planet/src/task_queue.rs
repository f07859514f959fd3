//! Background chunk generation.
//!
//! Following the stage pattern: Dispatch → (rayon workers) → Collect
//!
//! ```text
//!  OctreeTree ──pending_jobs()──► dispatch ──rayon::spawn──► ChunkJob::run
//!      ▲                                                         │
//!      └──complete_generation()── collect ◄──crossbeam channel───┘
//! ```
//!
//! The queue is an explicit object owned by whoever drives generation. The
//! only shared state is the in-flight id set, locked just around insert and
//! remove; jobs share nothing else. A completion whose node was merged or
//! subdivided in the meantime is discarded by the tree.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, trace};
use web_time::Instant;

use crate::chunk::{ChunkId, ChunkMeshResult};
use crate::density::DensitySampler;
use crate::octree::{ChunkTask, OctreeKey, OctreeTree};

/// Finished chunk job.
#[derive(Clone, Debug)]
pub struct ChunkCompletion {
  /// Node the job was dispatched for.
  pub key: OctreeKey,
  pub result: ChunkMeshResult,
  /// Raw sampling + meshing time in microseconds
  pub mesh_time_us: u64,
}

/// Outcome of installing completions into a tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectStats {
  /// Meshes installed into live chunks.
  pub installed: usize,
  /// Results dropped because their chunk no longer exists.
  pub discarded: usize,
  /// Timing of every collected job, in arrival order.
  pub mesh_times_us: Vec<u64>,
}

impl CollectStats {
  #[inline]
  pub fn total(&self) -> usize {
    self.installed + self.discarded
  }
}

type InFlight = Arc<Mutex<HashSet<ChunkId>>>;

fn lock(in_flight: &InFlight) -> MutexGuard<'_, HashSet<ChunkId>> {
  in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Dispatches chunk jobs onto rayon's pool and routes results back.
pub struct ChunkTaskQueue {
  sender: Sender<ChunkCompletion>,
  receiver: Receiver<ChunkCompletion>,
  in_flight: InFlight,
  /// Jobs spawned but not yet received.
  outstanding: usize,
}

impl Default for ChunkTaskQueue {
  fn default() -> Self {
    Self::new()
  }
}

impl ChunkTaskQueue {
  pub fn new() -> Self {
    let (sender, receiver) = crossbeam_channel::unbounded();
    Self {
      sender,
      receiver,
      in_flight: Arc::new(Mutex::new(HashSet::new())),
      outstanding: 0,
    }
  }

  /// Claim every pending chunk in `tree` and spawn its job.
  ///
  /// Returns the number of jobs spawned.
  pub fn dispatch<S>(&mut self, tree: &mut OctreeTree, sampler: &Arc<S>) -> usize
  where
    S: DensitySampler + ?Sized + 'static,
  {
    let tasks = tree.pending_jobs();
    let spawned = tasks
      .into_iter()
      .filter(|task| self.spawn(*task, Arc::clone(sampler)))
      .count();
    if spawned > 0 {
      debug!(spawned, outstanding = self.outstanding, "chunk jobs dispatched");
    }
    spawned
  }

  /// Spawn one job. Returns false if that chunk is already in flight.
  pub fn spawn<S>(&mut self, task: ChunkTask, sampler: Arc<S>) -> bool
  where
    S: DensitySampler + ?Sized + 'static,
  {
    if !lock(&self.in_flight).insert(task.job.chunk_id) {
      trace!(chunk = task.job.chunk_id.raw(), "chunk already in flight");
      return false;
    }
    self.outstanding += 1;

    let sender = self.sender.clone();
    let in_flight = Arc::clone(&self.in_flight);

    rayon::spawn(move || {
      let start = Instant::now();
      let result = task.job.run(sampler.as_ref());
      let mesh_time_us = start.elapsed().as_micros() as u64;

      lock(&in_flight).remove(&task.job.chunk_id);

      // The receiver lives as long as the queue; a send error means the
      // queue is gone and nobody wants the result.
      let _ = sender.send(ChunkCompletion {
        key: task.key,
        result,
        mesh_time_us,
      });
    });
    true
  }

  /// Install every completion that has arrived, without blocking.
  pub fn collect(&mut self, tree: &mut OctreeTree) -> CollectStats {
    let mut stats = CollectStats::default();
    while let Ok(completion) = self.receiver.try_recv() {
      self.install(tree, completion, &mut stats);
    }
    stats
  }

  /// Block until every spawned job has finished, installing the results.
  pub fn wait_idle(&mut self, tree: &mut OctreeTree) -> CollectStats {
    let mut stats = CollectStats::default();
    while self.outstanding > 0 {
      match self.receiver.recv() {
        Ok(completion) => self.install(tree, completion, &mut stats),
        Err(_) => break,
      }
    }
    stats
  }

  fn install(&mut self, tree: &mut OctreeTree, completion: ChunkCompletion, stats: &mut CollectStats) {
    self.outstanding = self.outstanding.saturating_sub(1);
    stats.mesh_times_us.push(completion.mesh_time_us);
    if tree.complete_generation(&completion.key, completion.result) {
      stats.installed += 1;
    } else {
      stats.discarded += 1;
    }
  }

  /// Jobs spawned whose results have not been collected.
  #[inline]
  pub fn outstanding(&self) -> usize {
    self.outstanding
  }

  /// Jobs still running on a worker.
  pub fn in_flight_count(&self) -> usize {
    lock(&self.in_flight).len()
  }

  pub fn is_in_flight(&self, chunk: ChunkId) -> bool {
    lock(&self.in_flight).contains(&chunk)
  }

  /// True when no work remains.
  #[inline]
  pub fn is_idle(&self) -> bool {
    self.outstanding == 0
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;
