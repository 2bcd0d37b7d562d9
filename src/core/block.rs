use std::fmt;

use serde::{Deserialize, Serialize};

/// Material of a generated block
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Bedrock,
    Stone,
    Dirt,
    Grass,
    Water,
    Log,
    Leaves,
}

impl BlockType {
    pub const ALL: [BlockType; 7] = [
        BlockType::Bedrock,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Water,
        BlockType::Log,
        BlockType::Leaves,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlockType::Bedrock => "bedrock",
            BlockType::Stone => "stone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Water => "water",
            BlockType::Log => "log",
            BlockType::Leaves => "leaves",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single placed block in world coordinates
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(rename = "type")]
    pub kind: BlockType,
}

impl Block {
    pub fn new(x: i32, y: i32, z: i32, kind: BlockType) -> Self {
        Self { x, y, z, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_lowercase_serde_names() {
        for kind in BlockType::ALL {
            let encoded = bincode::serialize(&kind).unwrap();
            let decoded: BlockType = bincode::deserialize(&encoded).unwrap();
            assert_eq!(decoded, kind);
            assert_eq!(kind.to_string(), kind.name());
            assert_eq!(kind.name(), kind.name().to_lowercase());
        }
    }
}
