//! Background chunk generation with a worker pool
//!
//! Chunks are generated on worker threads so callers can keep serving
//! requests while terrain is synthesized. Each worker owns its own
//! [`ChunkGenerator`] clone bound to the same seed, so results are identical
//! to generating on the calling thread.

use std::io;
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::core::block::Block;
use crate::core::chunk::Chunk;
use crate::world::generator::ChunkGenerator;

const REQUEST_QUEUE_SIZE: usize = 256;
const RESULT_QUEUE_SIZE: usize = 64;

/// Request for chunk generation with priority
#[derive(Debug, Clone, Copy)]
pub struct ChunkGenRequest {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub priority: i32, // Lower = higher priority (distance squared)
}

/// Result of background chunk generation
#[derive(Debug)]
pub struct ChunkGenResult {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub chunk: Chunk,
    pub structures: Vec<Block>,
}

/// Manages background chunk generation with worker threads
pub struct ChunkLoader {
    request_tx: Sender<ChunkGenRequest>,
    result_rx: Receiver<ChunkGenResult>,
    pending: FxHashSet<(i32, i32)>,
    worker_count: usize,
}

impl ChunkLoader {
    /// Create a new ChunkLoader with one worker per CPU
    pub fn new(generator: &ChunkGenerator) -> io::Result<Self> {
        Self::with_worker_count(num_cpus::get(), generator)
    }

    /// Create a ChunkLoader with a specific number of workers
    pub fn with_worker_count(num_workers: usize, generator: &ChunkGenerator) -> io::Result<Self> {
        let num_workers = num_workers.max(1);
        // Bounded channels prevent unbounded memory growth
        let (request_tx, request_rx) = bounded::<ChunkGenRequest>(REQUEST_QUEUE_SIZE);
        let (result_tx, result_rx) = bounded::<ChunkGenResult>(RESULT_QUEUE_SIZE);

        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let generator = generator.clone();

            thread::Builder::new()
                .name(format!("chunk-gen-{}", worker_id))
                .spawn(move || {
                    // Exits once either side of the pool is dropped
                    while let Ok(req) = rx.recv() {
                        let chunk = generator.generate_chunk(req.chunk_x, req.chunk_z);
                        let structures = generator.generate_structures(req.chunk_x, req.chunk_z);

                        let result = ChunkGenResult {
                            chunk_x: req.chunk_x,
                            chunk_z: req.chunk_z,
                            chunk,
                            structures,
                        };
                        if tx.send(result).is_err() {
                            break;
                        }
                    }
                    trace!(worker_id, "chunk worker stopped");
                })?;
        }

        debug!(workers = num_workers, seed = %generator.seed(), "chunk loader started");

        Ok(ChunkLoader {
            request_tx,
            result_rx,
            pending: FxHashSet::default(),
            worker_count: num_workers,
        })
    }

    /// Request a chunk to be generated.
    ///
    /// Returns false when the chunk is already pending or the queue is full.
    pub fn request_chunk(&mut self, chunk_x: i32, chunk_z: i32, priority: i32) -> bool {
        if self.pending.contains(&(chunk_x, chunk_z)) {
            return false;
        }

        let request = ChunkGenRequest {
            chunk_x,
            chunk_z,
            priority,
        };
        if self.request_tx.try_send(request).is_err() {
            return false;
        }

        self.pending.insert((chunk_x, chunk_z));
        true
    }

    /// Request multiple chunks, lowest priority value first
    pub fn request_chunks(&mut self, requests: &[(i32, i32, i32)]) -> usize {
        let mut sorted: Vec<_> = requests
            .iter()
            .filter(|(cx, cz, _)| !self.pending.contains(&(*cx, *cz)))
            .copied()
            .collect();
        sorted.sort_by_key(|&(_, _, priority)| priority);

        let mut queued = 0;
        for (cx, cz, priority) in sorted {
            if self.pending.len() >= REQUEST_QUEUE_SIZE {
                break;
            }
            if self.request_chunk(cx, cz, priority) {
                queued += 1;
            }
        }
        queued
    }

    /// Check if a chunk is pending generation
    pub fn is_pending(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.pending.contains(&(chunk_x, chunk_z))
    }

    /// Get the number of pending chunks
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Poll for completed chunks (non-blocking)
    /// Returns up to max_results completed chunks
    pub fn poll_results(&mut self, max_results: usize) -> Vec<ChunkGenResult> {
        let mut results = Vec::with_capacity(max_results);

        for _ in 0..max_results {
            match self.result_rx.try_recv() {
                Ok(result) => {
                    self.pending.remove(&(result.chunk_x, result.chunk_z));
                    results.push(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        results
    }

    /// Block until the next result arrives; None once every worker is gone
    pub fn wait_result(&mut self) -> Option<ChunkGenResult> {
        let result = self.result_rx.recv().ok()?;
        self.pending.remove(&(result.chunk_x, result.chunk_z));
        Some(result)
    }

    /// Get worker count
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}
