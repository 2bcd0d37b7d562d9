//! Core data structures for the generator
//! Contains fundamental types like blocks, biomes and chunks.

pub mod biome;
pub mod block;
pub mod chunk;

// Re-export commonly used types
pub use biome::Biome;
pub use block::{Block, BlockType};
pub use chunk::Chunk;
