//! Decorative structures placed on top of generated terrain

pub mod placer;
pub mod structure;
pub mod tree;

pub use placer::{StructureAnchor, StructurePlacer, generate_structures, placement_roll, qualifies};
pub use structure::Structure;
pub use tree::Tree;
