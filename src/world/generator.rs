//! Deterministic chunk synthesis
//!
//! Heightmaps come from fractal (fBm) summation over the seeded noise
//! source; each column is then materialized bottom to top. A generator only
//! reads its own [`NoiseContext`] and options, so it can run on any thread
//! and in any chunk order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::*;
use crate::core::biome::Biome;
use crate::core::block::{Block, BlockType};
use crate::core::chunk::Chunk;
use crate::world::noise::{NoiseContext, WorldSeed};
use crate::world::structures::StructurePlacer;

/// Tunables for terrain synthesis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub chunk_size: i32,
    pub world_height: i32,
    pub sea_level: i32,
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            world_height: WORLD_HEIGHT,
            sea_level: SEA_LEVEL,
            scale: TERRAIN_SCALE,
            octaves: TERRAIN_OCTAVES,
            persistence: TERRAIN_PERSISTENCE,
        }
    }
}

/// Chunk generator bound to one seed
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    noise: NoiseContext,
    options: GenerationOptions,
}

impl ChunkGenerator {
    /// Create a new ChunkGenerator with the specified seed and default options
    pub fn new(seed: impl Into<WorldSeed>) -> Self {
        Self::with_options(seed, GenerationOptions::default())
    }

    pub fn with_options(seed: impl Into<WorldSeed>, options: GenerationOptions) -> Self {
        Self::from_context(NoiseContext::new(seed), options)
    }

    pub fn from_context(noise: NoiseContext, options: GenerationOptions) -> Self {
        ChunkGenerator { noise, options }
    }

    pub fn seed(&self) -> &WorldSeed {
        self.noise.seed()
    }

    pub fn noise(&self) -> &NoiseContext {
        &self.noise
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Surface height of a world column, before clamping to the world ceiling
    pub fn terrain_height(&self, world_x: i32, world_z: i32) -> i32 {
        let opts = &self.options;
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = opts.scale;
        let mut max_value = 0.0;

        // At least one octave, otherwise the normalization divides by zero
        for _ in 0..opts.octaves.max(1) {
            total += self
                .noise
                .sample(world_x as f64 * frequency, world_z as f64 * frequency)
                * amplitude;
            max_value += amplitude;
            amplitude *= opts.persistence;
            frequency *= 2.0;
        }

        let normalized = (total / max_value + 1.0) / 2.0;
        let half_band = TERRAIN_BAND / 2.0;
        (normalized * TERRAIN_BAND + opts.sea_level as f64 - half_band).floor() as i32
    }

    /// Whether every block of the chunk has a world coordinate that fits in `i32`.
    ///
    /// Chunk coordinates from untrusted input must pass this before
    /// generation; the grid itself is unbounded only up to that limit.
    pub fn contains_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool {
        let size = self.options.chunk_size;
        chunk_origin(chunk_x, size).is_some() && chunk_origin(chunk_z, size).is_some()
    }

    /// Heights of every column of a chunk, indexed `local_x * size + local_z`
    pub fn height_map(&self, chunk_x: i32, chunk_z: i32) -> Vec<i32> {
        let size = self.options.chunk_size;
        let base_x = chunk_x * size;
        let base_z = chunk_z * size;

        let mut heights = Vec::with_capacity((size * size).max(0) as usize);
        for lx in 0..size {
            for lz in 0..size {
                heights.push(self.terrain_height(base_x + lx, base_z + lz));
            }
        }
        heights
    }

    /// Generate a complete chunk at the given coordinates
    pub fn generate_chunk(&self, chunk_x: i32, chunk_z: i32) -> Chunk {
        let opts = &self.options;
        let size = opts.chunk_size;
        let columns = (size * size).max(0) as usize;
        let mut chunk = Chunk::with_capacity(chunk_x, chunk_z, columns * opts.sea_level.max(1) as usize);

        let heights = self.height_map(chunk_x, chunk_z);
        let base_x = chunk_x * size;
        let base_z = chunk_z * size;

        for lx in 0..size {
            for lz in 0..size {
                let height = heights[(lx * size + lz) as usize];
                self.push_column(&mut chunk, base_x + lx, base_z + lz, height);
            }
        }

        debug!(
            chunk_x,
            chunk_z,
            seed = %self.seed(),
            blocks = chunk.len(),
            "generated chunk"
        );
        chunk
    }

    /// Materialize one column of height `height`, bottom to top, water last
    fn push_column(&self, chunk: &mut Chunk, world_x: i32, world_z: i32, height: i32) {
        let opts = &self.options;
        // Surface materials are placed relative to the clamped height
        let height = height.min(opts.world_height);

        if height <= 0 {
            chunk.push(world_x, 0, world_z, BlockType::Bedrock);
            return;
        }

        for y in 0..height {
            chunk.push(world_x, y, world_z, self.column_block(y, height));
        }

        if height < opts.sea_level {
            let water_top = opts.sea_level.min(opts.world_height);
            for y in height..water_top {
                chunk.push(world_x, y, world_z, BlockType::Water);
            }
        }
    }

    fn column_block(&self, y: i32, height: i32) -> BlockType {
        let above_sea = height > self.options.sea_level;

        if y == 0 {
            BlockType::Bedrock
        } else if above_sea && y == height - 1 {
            BlockType::Grass
        } else if above_sea && y > height - 4 {
            BlockType::Dirt
        } else {
            BlockType::Stone
        }
    }

    /// Structure blocks anchored in the chunk (at most one tree)
    pub fn generate_structures(&self, chunk_x: i32, chunk_z: i32) -> Vec<Block> {
        StructurePlacer::new(&self.noise, &self.options).generate(chunk_x, chunk_z)
    }

    /// Advisory biome of a chunk from large-scale noise
    pub fn classify_biome(&self, chunk_x: i32, chunk_z: i32) -> Biome {
        classify_with(&self.noise, chunk_x, chunk_z)
    }
}

impl Default for ChunkGenerator {
    fn default() -> Self {
        ChunkGenerator::new(WorldSeed::default())
    }
}

/// World coordinate of a chunk's first block, if the whole chunk fits in `i32`
pub fn chunk_origin(chunk: i32, chunk_size: i32) -> Option<i32> {
    let origin = chunk.checked_mul(chunk_size)?;
    origin.checked_add(chunk_size.max(1) - 1)?;
    Some(origin)
}

fn classify_with(noise: &NoiseContext, chunk_x: i32, chunk_z: i32) -> Biome {
    let value = noise.sample(chunk_x as f64 * BIOME_SCALE, chunk_z as f64 * BIOME_SCALE);
    Biome::from_noise(value)
}

/// One-shot chunk generation for a seed
pub fn generate_chunk(
    chunk_x: i32,
    chunk_z: i32,
    seed: impl Into<WorldSeed>,
    options: GenerationOptions,
) -> Chunk {
    ChunkGenerator::with_options(seed, options).generate_chunk(chunk_x, chunk_z)
}

/// One-shot biome classification for a seed
pub fn classify_biome(chunk_x: i32, chunk_z: i32, seed: impl Into<WorldSeed>) -> Biome {
    classify_with(&NoiseContext::new(seed), chunk_x, chunk_z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_heights(generator: &ChunkGenerator, cx: i32, cz: i32) -> Vec<(i32, i32, i32)> {
        let size = generator.options().chunk_size;
        generator
            .height_map(cx, cz)
            .into_iter()
            .enumerate()
            .map(|(i, h)| {
                let lx = i as i32 / size;
                let lz = i as i32 % size;
                (cx * size + lx, cz * size + lz, h)
            })
            .collect()
    }

    #[test]
    fn test_generation_is_deterministic() {
        for (cx, cz) in [(0, 0), (-3, 7), (120, -45)] {
            let a = generate_chunk(cx, cz, "determinism", GenerationOptions::default());
            let b = generate_chunk(cx, cz, "determinism", GenerationOptions::default());
            assert!(a.same_content(&b), "chunk ({cx}, {cz}) differs between runs");
        }
    }

    #[test]
    fn test_generation_order_does_not_matter() {
        let generator = ChunkGenerator::new("order");
        let first = generator.generate_chunk(2, 2);
        for (cx, cz) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            generator.generate_chunk(cx, cz);
        }
        assert!(first.same_content(&generator.generate_chunk(2, 2)));
    }

    #[test]
    fn test_seed_sensitivity() {
        let a = ChunkGenerator::new("alpha");
        let b = ChunkGenerator::new("bravo");
        let differs = (0..4).any(|cx| a.height_map(cx, 0) != b.height_map(cx, 0));
        assert!(differs, "distinct seeds produced identical heightmaps");
    }

    #[test]
    fn test_heights_stay_in_band() {
        let generator = ChunkGenerator::new("band");
        for cx in -2..2 {
            for cz in -2..2 {
                for h in generator.height_map(cx, cz) {
                    assert!((SEA_LEVEL - 20..=SEA_LEVEL + 20).contains(&h), "height {h}");
                }
            }
        }
    }

    #[test]
    fn test_column_invariants() {
        let generator = ChunkGenerator::new("columns");
        for (cx, cz) in [(0, 0), (5, -5), (-9, 13)] {
            let chunk = generator.generate_chunk(cx, cz);
            for (wx, wz, height) in column_heights(&generator, cx, cz) {
                let column: Vec<_> = chunk.column(wx, wz).collect();
                let bottom = column.iter().find(|b| b.y == 0).unwrap();
                assert_eq!(bottom.kind, BlockType::Bedrock);

                for block in &column {
                    if block.kind == BlockType::Water {
                        assert!(block.y >= height && block.y < SEA_LEVEL);
                    } else {
                        assert!(block.y < height.min(WORLD_HEIGHT));
                    }
                }

                let expected = if height < SEA_LEVEL { SEA_LEVEL } else { height };
                assert_eq!(column.len() as i32, expected);

                if height > SEA_LEVEL {
                    let top = column.iter().max_by_key(|b| b.y).unwrap();
                    assert_eq!((top.y, top.kind), (height - 1, BlockType::Grass));
                    let dirt = column.iter().filter(|b| b.kind == BlockType::Dirt).count();
                    assert_eq!(dirt, 2);
                } else {
                    assert!(column.iter().all(|b| b.kind != BlockType::Grass));
                    assert!(column.iter().all(|b| b.kind != BlockType::Dirt));
                }
            }
        }
    }

    #[test]
    fn test_chunk_boundary_continuity() {
        let generator = ChunkGenerator::new("seams");
        let size = CHUNK_SIZE;
        for cx in -3..3 {
            let left = generator.height_map(cx, 0);
            let right = generator.height_map(cx + 1, 0);
            for lz in 0..size {
                let edge = left[((size - 1) * size + lz) as usize];
                let next = right[lz as usize];
                assert!((edge - next).abs() <= 8, "jump {edge} -> {next} at chunk {cx}");
            }
        }
    }

    #[test]
    fn test_demo_scenario() {
        let chunk = generate_chunk(0, 0, "blockverse-demo", GenerationOptions::default());
        assert!(!chunk.is_empty());
        let lowest = chunk.lowest_block().unwrap();
        assert_eq!((lowest.y, lowest.kind), (0, BlockType::Bedrock));
        assert!(chunk.contains(BlockType::Grass) || chunk.contains(BlockType::Water));
    }

    #[test]
    fn test_low_terrain_keeps_single_bedrock() {
        let options = GenerationOptions {
            sea_level: -30,
            ..GenerationOptions::default()
        };
        // Heights land in [-50, -10]: every column is just bedrock
        let chunk = generate_chunk(0, 0, "abyss", options);
        assert_eq!(chunk.len(), (CHUNK_SIZE * CHUNK_SIZE) as usize);
        assert!(chunk.blocks.iter().all(|b| b.y == 0 && b.kind == BlockType::Bedrock));
    }

    #[test]
    fn test_world_ceiling_clamps_columns() {
        let options = GenerationOptions {
            world_height: 50,
            ..GenerationOptions::default()
        };
        let chunk = generate_chunk(1, 1, "ceiling", options);
        assert!(chunk.blocks.iter().all(|b| b.y < 50));
    }

    #[test]
    fn test_clamped_columns_keep_their_surface() {
        let ceiling = SEA_LEVEL + 2;
        let options = GenerationOptions {
            world_height: ceiling,
            ..GenerationOptions::default()
        };
        let generator = ChunkGenerator::with_options("ceiling", options);

        let mut clamped = 0;
        for cx in 0..4 {
            for cz in 0..4 {
                let chunk = generator.generate_chunk(cx, cz);
                for (wx, wz, height) in column_heights(&generator, cx, cz) {
                    if height <= ceiling {
                        continue;
                    }
                    let column: Vec<_> = chunk.column(wx, wz).collect();
                    let top = column.iter().max_by_key(|b| b.y).unwrap();
                    assert_eq!((top.y, top.kind), (ceiling - 1, BlockType::Grass));
                    let dirt: Vec<_> = column
                        .iter()
                        .filter(|b| b.kind == BlockType::Dirt)
                        .map(|b| b.y)
                        .collect();
                    assert_eq!(dirt, vec![ceiling - 3, ceiling - 2]);
                    assert_eq!(column.len() as i32, ceiling);
                    clamped += 1;
                }
            }
        }
        assert!(clamped > 0, "no column reached the ceiling");
    }

    #[test]
    fn test_columns_at_or_below_zero_are_bare_bedrock() {
        let sea = 3;
        let options = GenerationOptions {
            sea_level: sea,
            ..GenerationOptions::default()
        };
        // Heights land in [-17, 23]; the sea still covers columns of height 1 and 2
        let generator = ChunkGenerator::with_options("deep", options);

        let mut buried = 0;
        for cx in 0..4 {
            for cz in 0..4 {
                let chunk = generator.generate_chunk(cx, cz);
                for (wx, wz, height) in column_heights(&generator, cx, cz) {
                    let column: Vec<_> = chunk.column(wx, wz).collect();
                    if height <= 0 {
                        assert_eq!(column.len(), 1, "column ({wx}, {wz}) at height {height}");
                        assert_eq!((column[0].y, column[0].kind), (0, BlockType::Bedrock));
                        buried += 1;
                    } else if height < sea {
                        assert_eq!(column.len() as i32, sea);
                        let water = column.iter().filter(|b| b.kind == BlockType::Water);
                        assert!(water.clone().all(|b| b.y >= height));
                        assert_eq!(water.count() as i32, sea - height);
                    }
                }
            }
        }
        assert!(buried > 0, "no column at or below zero");
    }

    #[test]
    fn test_chunk_origin_rejects_overflowing_chunks() {
        assert_eq!(chunk_origin(3, 16), Some(48));
        assert_eq!(chunk_origin(-1, 16), Some(-16));
        assert_eq!(chunk_origin(134_217_727, 16), Some(2_147_483_632));
        assert_eq!(chunk_origin(-134_217_728, 16), Some(i32::MIN));
        assert_eq!(chunk_origin(134_217_728, 16), None);
        assert_eq!(chunk_origin(200_000_000, 16), None);
        assert_eq!(chunk_origin(-134_217_729, 16), None);

        let generator = ChunkGenerator::default();
        assert!(generator.contains_chunk(0, -134_217_728));
        assert!(!generator.contains_chunk(200_000_000, 0));
    }

    #[test]
    fn test_zero_octaves_still_generates() {
        let options = GenerationOptions {
            octaves: 0,
            ..GenerationOptions::default()
        };
        let chunk = generate_chunk(0, 0, "flat", options);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_biome_classification_is_deterministic() {
        let generator = ChunkGenerator::new("biomes");
        for (cx, cz) in [(0, 0), (100, -200), (-5000, 3000)] {
            assert_eq!(generator.classify_biome(cx, cz), classify_biome(cx, cz, "biomes"));
        }
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options = GenerationOptions::default();
        let bytes = bincode::serialize(&options).unwrap();
        let decoded: GenerationOptions = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, options);
    }
}
