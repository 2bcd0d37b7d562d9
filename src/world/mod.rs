//! World generation modules
//! Contains the seeded noise source, chunk synthesis, structures and the
//! background loader.

pub mod generator;
pub mod loader;
pub mod noise;
pub mod structures;

// Re-export commonly used types
pub use generator::{
    ChunkGenerator, GenerationOptions, chunk_origin, classify_biome, generate_chunk,
};
pub use loader::{ChunkGenRequest, ChunkGenResult, ChunkLoader};
pub use noise::{NoiseContext, SeedRandom, WorldSeed, hash_seed};
pub use structures::{StructurePlacer, generate_structures};
