use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse, advisory terrain classification of a chunk
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Ocean,
    #[default]
    Plains,
    Forest,
    Hills,
    Mountains,
}

impl Biome {
    /// Bucket a large-scale noise value in [-1, 1].
    ///
    /// Thresholds are checked in ascending order, so every value maps to
    /// exactly one biome.
    pub fn from_noise(value: f64) -> Self {
        if value < -0.3 {
            Biome::Ocean
        } else if value < 0.0 {
            Biome::Plains
        } else if value < 0.3 {
            Biome::Forest
        } else if value < 0.6 {
            Biome::Hills
        } else {
            Biome::Mountains
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::Plains => "plains",
            Biome::Forest => "forest",
            Biome::Hills => "hills",
            Biome::Mountains => "mountains",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_buckets() {
        assert_eq!(Biome::from_noise(-1.0), Biome::Ocean);
        assert_eq!(Biome::from_noise(-0.31), Biome::Ocean);
        assert_eq!(Biome::from_noise(-0.3), Biome::Plains);
        assert_eq!(Biome::from_noise(-0.01), Biome::Plains);
        assert_eq!(Biome::from_noise(0.0), Biome::Forest);
        assert_eq!(Biome::from_noise(0.29), Biome::Forest);
        assert_eq!(Biome::from_noise(0.3), Biome::Hills);
        assert_eq!(Biome::from_noise(0.59), Biome::Hills);
        assert_eq!(Biome::from_noise(0.6), Biome::Mountains);
        assert_eq!(Biome::from_noise(1.0), Biome::Mountains);
    }

    #[test]
    fn test_display_matches_name() {
        assert_eq!(Biome::Mountains.to_string(), "mountains");
        assert_eq!(Biome::default(), Biome::Plains);
    }
}
