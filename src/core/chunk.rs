use serde::{Deserialize, Serialize};

use crate::core::block::{Block, BlockType};

/// Blocks generated for one chunk coordinate.
///
/// The block list is dense: every non-air block of every column is present.
/// `timestamp` (Unix milliseconds) is bookkeeping for callers that cache
/// chunks and is never read by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub blocks: Vec<Block>,
    pub timestamp: i64,
}

impl Chunk {
    pub fn new(chunk_x: i32, chunk_z: i32) -> Self {
        Chunk {
            chunk_x,
            chunk_z,
            blocks: Vec::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_capacity(chunk_x: i32, chunk_z: i32, capacity: usize) -> Self {
        let mut chunk = Self::new(chunk_x, chunk_z);
        chunk.blocks.reserve(capacity);
        chunk
    }

    pub fn push(&mut self, x: i32, y: i32, z: i32, kind: BlockType) {
        self.blocks.push(Block::new(x, y, z, kind));
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block with the smallest y, first in emission order on ties
    pub fn lowest_block(&self) -> Option<&Block> {
        self.blocks.iter().min_by_key(|b| b.y)
    }

    /// All blocks of one world column, in emission order
    pub fn column(&self, world_x: i32, world_z: i32) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |b| b.x == world_x && b.z == world_z)
    }

    pub fn count(&self, kind: BlockType) -> usize {
        self.blocks.iter().filter(|b| b.kind == kind).count()
    }

    pub fn contains(&self, kind: BlockType) -> bool {
        self.blocks.iter().any(|b| b.kind == kind)
    }

    /// Compare generated content, ignoring the timestamp
    pub fn same_content(&self, other: &Chunk) -> bool {
        self.chunk_x == other.chunk_x
            && self.chunk_z == other.chunk_z
            && self.blocks == other.blocks
    }
}
