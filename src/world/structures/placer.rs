use tracing::trace;

use super::Tree;
use crate::constants::*;
use crate::core::block::Block;
use crate::world::generator::GenerationOptions;
use crate::world::noise::{NoiseContext, WorldSeed, hash_seed};

/// Where a chunk's structure is rooted, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureAnchor {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Per-chunk roll used for the placement decision and anchor offsets.
///
/// Keyed on the chunk coordinate alone, never on the seed, so placement is
/// decorrelated from the terrain noise.
pub fn placement_roll(chunk_x: i32, chunk_z: i32) -> f64 {
    hash_seed(&format!("tree_{chunk_x}_{chunk_z}")) as f64 / 1_000_000.0
}

/// Whether a roll places a structure (fractional part above the threshold)
pub fn qualifies(roll: f64) -> bool {
    roll.fract() > STRUCTURE_THRESHOLD
}

/// Decides and emits decorative structures for chunks
pub struct StructurePlacer<'a> {
    noise: &'a NoiseContext,
    chunk_size: i32,
    world_height: i32,
    tree: Tree,
}

impl<'a> StructurePlacer<'a> {
    pub fn new(noise: &'a NoiseContext, options: &GenerationOptions) -> Self {
        Self {
            noise,
            chunk_size: options.chunk_size,
            world_height: options.world_height,
            tree: Tree::new(),
        }
    }

    /// Anchor of the chunk's tree, if the chunk gets one.
    ///
    /// The ground height is a single noise sample, not the synthesized column
    /// height, so a trunk may start above or below the actual surface.
    pub fn anchor(&self, chunk_x: i32, chunk_z: i32) -> Option<StructureAnchor> {
        let roll = placement_roll(chunk_x, chunk_z);
        if !qualifies(roll) {
            return None;
        }

        // Offsets in [margin, size - margin) keep the canopy inside the chunk
        let span = (self.chunk_size - 2 * STRUCTURE_MARGIN) as f64;
        if span <= 0.0 {
            return None;
        }
        let offset_x = ((roll * 13.0) % span).floor() as i32 + STRUCTURE_MARGIN;
        let offset_z = ((roll * 17.0) % span).floor() as i32 + STRUCTURE_MARGIN;
        let x = chunk_x * self.chunk_size + offset_x;
        let z = chunk_z * self.chunk_size + offset_z;

        let ground = self
            .noise
            .sample(x as f64 * TREE_GROUND_SCALE, z as f64 * TREE_GROUND_SCALE);
        let y = TREE_GROUND_BASE + ((ground + 1.0) * TREE_GROUND_RANGE).floor() as i32;

        Some(StructureAnchor { x, y, z })
    }

    /// Structure blocks of one chunk; empty when the chunk has none
    pub fn generate(&self, chunk_x: i32, chunk_z: i32) -> Vec<Block> {
        let Some(anchor) = self.anchor(chunk_x, chunk_z) else {
            return Vec::new();
        };

        trace!(
            chunk_x,
            chunk_z,
            ?anchor,
            structure = %self.tree.structure.name,
            "placing structure"
        );
        self.tree
            .structure
            .place(anchor.x, anchor.y, anchor.z)
            .filter(|b| b.y >= 0 && b.y < self.world_height)
            .collect()
    }
}

/// One-shot structure generation for a seed with default options
pub fn generate_structures(chunk_x: i32, chunk_z: i32, seed: impl Into<WorldSeed>) -> Vec<Block> {
    let noise = NoiseContext::new(seed);
    StructurePlacer::new(&noise, &GenerationOptions::default()).generate(chunk_x, chunk_z)
}
