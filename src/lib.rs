// Core module with fundamental types
pub mod core;

// World module with noise, generation and structures
pub mod world;

// Request/response boundary and its TCP transport
pub mod server;
pub mod service;

// Other modules
pub mod constants;
pub mod settings;

// Re-exports
pub use constants::*;
pub use core::{Biome, Block, BlockType, Chunk};
pub use service::{ChunkResponse, CreatedWorld, ServiceError, WorldInfo, WorldKind, WorldService};
pub use settings::{ServerSettings, load_settings, save_settings};
pub use world::{
    ChunkGenerator, ChunkLoader, GenerationOptions, NoiseContext, WorldSeed, classify_biome,
    generate_chunk, generate_structures,
};
