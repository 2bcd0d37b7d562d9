//! Request/response boundary of the generator
//!
//! Transport-agnostic: the TCP server in [`crate::server`] is one caller,
//! tests and embedding applications are others. Input validation happens
//! here, before any generation is attempted.

use std::collections::VecDeque;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::*;
use crate::core::biome::Biome;
use crate::core::block::Block;
use crate::world::generator::{ChunkGenerator, GenerationOptions, chunk_origin};
use crate::world::noise::WorldSeed;

/// Errors surfaced to callers of the service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A chunk coordinate was not an integer, or its blocks would fall
    /// outside the 32-bit world coordinate range
    #[error("invalid chunk coordinate {axis}: {value:?}")]
    InvalidCoordinate { axis: &'static str, value: String },

    /// World creation was attempted without a name
    #[error("world name is required")]
    MissingWorldName,
}

/// One generated chunk as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub blocks: Vec<Block>,
    pub structures: Vec<Block>,
    pub biome: Biome,
    pub generated: bool,
    pub timestamp: i64,
}

impl ChunkResponse {
    /// Compare generated content, ignoring the timestamp
    pub fn same_content(&self, other: &ChunkResponse) -> bool {
        self.chunk_x == other.chunk_x
            && self.chunk_z == other.chunk_z
            && self.blocks == other.blocks
            && self.structures == other.structures
            && self.biome == other.biome
    }
}

/// How a world's terrain is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldKind {
    #[default]
    Procedural,
}

/// World metadata; never carries geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub id: String,
    pub name: String,
    pub seed: WorldSeed,
    #[serde(rename = "type")]
    pub kind: WorldKind,
    pub spawn_x: i32,
    pub spawn_y: i32,
    pub spawn_z: i32,
}

/// A freshly created world with its pre-generated spawn area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedWorld {
    pub id: String,
    pub name: String,
    pub seed: WorldSeed,
    pub spawn_x: i32,
    pub spawn_y: i32,
    pub spawn_z: i32,
    pub spawn_chunks: Vec<ChunkResponse>,
    pub generated: bool,
    pub created_at: i64,
}

impl CreatedWorld {
    pub fn info(&self) -> WorldInfo {
        WorldInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            seed: self.seed.clone(),
            kind: WorldKind::Procedural,
            spawn_x: self.spawn_x,
            spawn_y: self.spawn_y,
            spawn_z: self.spawn_z,
        }
    }
}

/// Parse a chunk coordinate strictly: optional sign and digits, surrounding
/// whitespace ignored, nothing else.
pub fn parse_coordinate(axis: &'static str, value: &str) -> Result<i32, ServiceError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::InvalidCoordinate {
            axis,
            value: value.to_string(),
        })
}

/// Worlds created through a service, oldest evicted first once full
struct WorldRegistry {
    by_id: FxHashMap<String, WorldInfo>,
    order: VecDeque<String>,
    capacity: usize,
}

impl WorldRegistry {
    fn new(capacity: usize) -> Self {
        Self {
            by_id: FxHashMap::default(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn insert(&mut self, info: WorldInfo) {
        while self.order.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.by_id.remove(&oldest);
            debug!(id = %oldest, "evicted world from registry");
        }
        self.order.push_back(info.id.clone());
        self.by_id.insert(info.id.clone(), info);
    }
}

/// Stateless generation plus a bounded registry of worlds created through it
pub struct WorldService {
    options: GenerationOptions,
    default_seed: WorldSeed,
    worlds: RwLock<WorldRegistry>,
}

impl WorldService {
    pub fn new(options: GenerationOptions, default_seed: WorldSeed) -> Self {
        Self::with_registry_capacity(options, default_seed, MAX_REGISTERED_WORLDS)
    }

    /// Service remembering at most `capacity` created worlds
    pub fn with_registry_capacity(
        options: GenerationOptions,
        default_seed: WorldSeed,
        capacity: usize,
    ) -> Self {
        Self {
            options,
            default_seed,
            worlds: RwLock::new(WorldRegistry::new(capacity)),
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn default_seed(&self) -> &WorldSeed {
        &self.default_seed
    }

    fn resolve_seed(&self, seed: Option<&str>) -> WorldSeed {
        match seed {
            Some(seed) if !seed.is_empty() => WorldSeed::from(seed),
            _ => self.default_seed.clone(),
        }
    }

    /// Parse a chunk coordinate and check its blocks stay addressable
    fn chunk_coordinate(&self, axis: &'static str, value: &str) -> Result<i32, ServiceError> {
        let chunk = parse_coordinate(axis, value)?;
        match chunk_origin(chunk, self.options.chunk_size) {
            Some(_) => Ok(chunk),
            None => Err(ServiceError::InvalidCoordinate {
                axis,
                value: value.to_string(),
            }),
        }
    }

    /// Generate the chunk at textual coordinates; a missing or empty seed
    /// falls back to the service's default seed.
    pub fn chunk(&self, x: &str, z: &str, seed: Option<&str>) -> Result<ChunkResponse, ServiceError> {
        let chunk_x = self.chunk_coordinate("x", x)?;
        let chunk_z = self.chunk_coordinate("z", z)?;
        let generator = ChunkGenerator::with_options(self.resolve_seed(seed), self.options);
        Ok(chunk_response(&generator, chunk_x, chunk_z))
    }

    /// Metadata for a world id. Ids this service did not create are treated
    /// as their own name and seed.
    pub fn world_info(&self, world_id: &str) -> WorldInfo {
        if let Some(info) = self.worlds.read().by_id.get(world_id) {
            return info.clone();
        }

        WorldInfo {
            id: world_id.to_string(),
            name: world_id.to_string(),
            seed: WorldSeed::from(world_id),
            kind: WorldKind::Procedural,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            spawn_z: SPAWN_Z,
        }
    }

    /// Create a world and eagerly generate the 3x3 chunks around the origin
    pub fn create_world(&self, name: &str, seed: Option<&str>) -> Result<CreatedWorld, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::MissingWorldName);
        }

        let seed = match seed {
            Some(seed) if !seed.is_empty() => WorldSeed::from(seed),
            _ => WorldSeed::random(),
        };
        let generator = ChunkGenerator::with_options(seed.clone(), self.options);

        let r = SPAWN_CHUNK_RADIUS;
        let mut spawn_chunks = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for cx in -r..=r {
            for cz in -r..=r {
                spawn_chunks.push(chunk_response(&generator, cx, cz));
            }
        }

        let world = CreatedWorld {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            seed,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            spawn_z: SPAWN_Z,
            spawn_chunks,
            generated: true,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        self.worlds.write().insert(world.info());
        info!(id = %world.id, name = %world.name, seed = %world.seed, "created world");
        Ok(world)
    }

    pub fn world_count(&self) -> usize {
        self.worlds.read().by_id.len()
    }
}

impl Default for WorldService {
    fn default() -> Self {
        WorldService::new(GenerationOptions::default(), WorldSeed::default())
    }
}

fn chunk_response(generator: &ChunkGenerator, chunk_x: i32, chunk_z: i32) -> ChunkResponse {
    let chunk = generator.generate_chunk(chunk_x, chunk_z);
    let structures = generator.generate_structures(chunk_x, chunk_z);
    let biome = generator.classify_biome(chunk_x, chunk_z);
    debug!(chunk_x, chunk_z, structures = structures.len(), %biome, "chunk response");

    ChunkResponse {
        chunk_x: chunk.chunk_x,
        chunk_z: chunk.chunk_z,
        blocks: chunk.blocks,
        structures,
        biome,
        generated: true,
        timestamp: chunk.timestamp,
    }
}
