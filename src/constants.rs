// World constants
pub const WORLD_HEIGHT: i32 = 256;
pub const CHUNK_SIZE: i32 = 16;
pub const SEA_LEVEL: i32 = 64;

// Terrain synthesis defaults
pub const TERRAIN_SCALE: f64 = 0.02;
pub const TERRAIN_OCTAVES: u32 = 4;
pub const TERRAIN_PERSISTENCE: f64 = 0.5;
/// Height of the band terrain surfaces are mapped onto (sea level +/- half of it)
pub const TERRAIN_BAND: f64 = 40.0;

// Biome sampling frequency (chunk coordinates, not block coordinates)
pub const BIOME_SCALE: f64 = 0.001;

// Structure placement
pub const STRUCTURE_THRESHOLD: f64 = 0.7;
pub const STRUCTURE_MARGIN: i32 = 2;
pub const TREE_TRUNK_HEIGHT: i32 = 5;
pub const TREE_CANOPY_RADIUS: i32 = 2;
pub const TREE_CANOPY_HEIGHT: i32 = 3;
pub const TREE_GROUND_BASE: i32 = 64;
pub const TREE_GROUND_RANGE: f64 = 10.0;
pub const TREE_GROUND_SCALE: f64 = 0.02;

// Seeds
pub const DEFAULT_SEED: &str = "blockverse-default";

// Spawn area
pub const SPAWN_X: i32 = 0;
pub const SPAWN_Y: i32 = 70;
pub const SPAWN_Z: i32 = 0;
pub const SPAWN_CHUNK_RADIUS: i32 = 1;

// Worlds remembered by a service before the oldest are forgotten
pub const MAX_REGISTERED_WORLDS: usize = 4096;

// Server
pub const DEFAULT_PORT: u16 = 25565;
pub const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;
