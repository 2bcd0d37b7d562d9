use super::Structure;
use crate::constants::{TREE_CANOPY_HEIGHT, TREE_CANOPY_RADIUS, TREE_TRUNK_HEIGHT};
use crate::core::block::BlockType;

/// Log trunk with a leaf canopy, anchored at the trunk base
#[derive(Debug, Clone)]
pub struct Tree {
    pub structure: Structure,
}

impl Tree {
    pub fn new() -> Self {
        let mut structure = Structure::new("Tree");

        // Trunk - vertical column of logs
        for y in 0..TREE_TRUNK_HEIGHT {
            structure.blocks.push((0, y, 0, BlockType::Log));
        }

        // Canopy - starts at the top log, diamond below, full square above
        let canopy_base = TREE_TRUNK_HEIGHT - 1;
        let r = TREE_CANOPY_RADIUS;
        for dx in -r..=r {
            for dy in 0..=TREE_CANOPY_HEIGHT {
                for dz in -r..=r {
                    if dx.abs() + dz.abs() <= r || dy > 1 {
                        structure.blocks.push((dx, canopy_base + dy, dz, BlockType::Leaves));
                    }
                }
            }
        }

        Self { structure }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_shape() {
        let tree = Tree::new();
        let logs: Vec<_> = tree
            .structure
            .blocks
            .iter()
            .filter(|b| b.3 == BlockType::Log)
            .collect();
        let leaves = tree
            .structure
            .blocks
            .iter()
            .filter(|b| b.3 == BlockType::Leaves)
            .count();

        assert_eq!(tree.structure.name, "Tree");
        assert_eq!(logs.len(), 5);
        assert!(logs.iter().all(|b| b.0 == 0 && b.2 == 0));
        // 13-cell diamonds on the two lower layers, full 5x5 on the upper two
        assert_eq!(leaves, 13 * 2 + 25 * 2);
    }

    #[test]
    fn test_canopy_bounds() {
        let tree = Tree::new();
        for &(dx, dy, dz, kind) in &tree.structure.blocks {
            if kind == BlockType::Leaves {
                assert!((-2..=2).contains(&dx) && (-2..=2).contains(&dz));
                assert!((4..=7).contains(&dy));
                if dy < 6 {
                    assert!(dx.abs() + dz.abs() <= 2);
                }
            }
        }
    }
}
