use crate::core::block::{Block, BlockType};

/// Block template positioned relative to an anchor
#[derive(Debug, Clone)]
pub struct Structure {
    pub name: String,
    pub blocks: Vec<(i32, i32, i32, BlockType)>, // offsets from the anchor
}

impl Structure {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, x: i32, y: i32, z: i32, block: BlockType) -> Self {
        self.blocks.push((x, y, z, block));
        self
    }

    /// World blocks of the template anchored at (x, y, z), in template order
    pub fn place(&self, x: i32, y: i32, z: i32) -> impl Iterator<Item = Block> + '_ {
        self.blocks
            .iter()
            .map(move |&(dx, dy, dz, kind)| Block::new(x + dx, y + dy, z + dz, kind))
    }
}
