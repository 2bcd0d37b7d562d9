//! Seeded noise source
//!
//! Turns an arbitrary seed string into an immutable [`NoiseContext`]. The
//! context is threaded explicitly into every generation call, so two worlds
//! with different seeds can be generated side by side on any number of
//! threads without sharing state.

use std::fmt;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SEED;

/// Opaque world seed. Integer seeds are hashed through their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(String);

impl WorldSeed {
    pub fn new(seed: impl Into<String>) -> Self {
        WorldSeed(seed.into())
    }

    /// Fresh seed for worlds created without one
    pub fn random() -> Self {
        WorldSeed(format!("{:016x}", rand::random::<u64>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hash(&self) -> u32 {
        hash_seed(&self.0)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        WorldSeed(DEFAULT_SEED.to_string())
    }
}

impl From<&str> for WorldSeed {
    fn from(seed: &str) -> Self {
        WorldSeed(seed.to_string())
    }
}

impl From<String> for WorldSeed {
    fn from(seed: String) -> Self {
        WorldSeed(seed)
    }
}

impl From<i64> for WorldSeed {
    fn from(seed: i64) -> Self {
        WorldSeed(seed.to_string())
    }
}

impl From<u64> for WorldSeed {
    fn from(seed: u64) -> Self {
        WorldSeed(seed.to_string())
    }
}

impl fmt::Display for WorldSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Polynomial rolling hash (`h = h * 31 + unit`) over UTF-16 code units,
/// wrapped to 32 signed bits, absolute value of the result.
///
/// Never fails: the empty string hashes to 0.
pub fn hash_seed(text: &str) -> u32 {
    let hash = text
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32));
    hash.unsigned_abs()
}

/// Sine-based pseudo-random sequence seeded from a hashed seed.
///
/// Weak, but kept so existing seeds keep producing the same noise binding.
#[derive(Debug, Clone)]
pub struct SeedRandom {
    state: f64,
}

impl SeedRandom {
    pub fn new(seed: u32) -> Self {
        Self { state: seed as f64 }
    }

    /// Next value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        // libm keeps the sequence identical across platforms
        let x = libm::sin(self.state) * 10000.0;
        self.state += 1.0;
        x - x.floor()
    }

    /// Next value spread over the full `i32` range
    pub fn next_i32(&mut self) -> i32 {
        (self.next_f64() * u32::MAX as f64) as u32 as i32
    }
}

/// Immutable noise binding for one seed.
///
/// Built once per seed; rebinding a seed means building a new context, so
/// no entropy ever leaks from a previous seed.
pub struct NoiseContext {
    seed: WorldSeed,
    seed_hash: u32,
    noise_seed: i32,
    noise: FastNoiseLite,
}

impl NoiseContext {
    pub fn new(seed: impl Into<WorldSeed>) -> Self {
        let seed = seed.into();
        let seed_hash = seed.hash();
        let noise_seed = SeedRandom::new(seed_hash).next_i32();

        NoiseContext {
            noise: Self::create_noise(noise_seed),
            seed,
            seed_hash,
            noise_seed,
        }
    }

    fn create_noise(noise_seed: i32) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(noise_seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Callers scale coordinates themselves
        noise.set_frequency(Some(1.0));
        noise
    }

    pub fn seed(&self) -> &WorldSeed {
        &self.seed
    }

    pub fn seed_hash(&self) -> u32 {
        self.seed_hash
    }

    pub fn noise_seed(&self) -> i32 {
        self.noise_seed
    }

    /// Continuous 2D noise in [-1, 1]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let value = self.noise.get_noise_2d(x as f32, z as f32) as f64;
        value.clamp(-1.0, 1.0)
    }
}

impl Default for NoiseContext {
    fn default() -> Self {
        NoiseContext::new(WorldSeed::default())
    }
}

// Allow cloning for worker threads
impl Clone for NoiseContext {
    fn clone(&self) -> Self {
        NoiseContext::new(self.seed.clone())
    }
}

impl fmt::Debug for NoiseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseContext")
            .field("seed", &self.seed)
            .field("seed_hash", &self.seed_hash)
            .field("noise_seed", &self.noise_seed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_rolling_polynomial() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("a"), 97);
        assert_eq!(hash_seed("ab"), 97 * 31 + 98);
        // Overflows 32 bits and wraps negative before the absolute value
        assert_eq!(hash_seed("blockverse-default"), hash_seed("blockverse-default"));
        assert_ne!(hash_seed("seed-A"), hash_seed("seed-B"));
    }

    #[test]
    fn test_hash_uses_utf16_code_units() {
        // U+1F600 is a surrogate pair: 0xD83D 0xDE00
        let expected = (0xD83Di32).wrapping_mul(31).wrapping_add(0xDE00).unsigned_abs();
        assert_eq!(hash_seed("\u{1F600}"), expected);
    }

    #[test]
    fn test_seed_random_is_repeatable_and_bounded() {
        let mut a = SeedRandom::new(12345);
        let mut b = SeedRandom::new(12345);
        for _ in 0..100 {
            let va = a.next_f64();
            assert_eq!(va, b.next_f64());
            assert!((0.0..1.0).contains(&va));
        }
    }

    #[test]
    fn test_same_seed_same_noise() {
        let a = NoiseContext::new("blockverse-demo");
        let b = NoiseContext::new("blockverse-demo");
        assert_eq!(a.noise_seed(), b.noise_seed());
        for i in 0..50 {
            let x = i as f64 * 0.37;
            let z = -(i as f64) * 0.53;
            assert_eq!(a.sample(x, z), b.sample(x, z));
        }
    }

    #[test]
    fn test_rebinding_resets_state() {
        let original = NoiseContext::new("first");
        let _other = NoiseContext::new("second");
        let rebound = NoiseContext::new("first");
        assert_eq!(original.sample(1.25, 3.5), rebound.sample(1.25, 3.5));
        assert_eq!(original.clone().sample(7.0, 0.5), original.sample(7.0, 0.5));
    }

    #[test]
    fn test_noise_is_bounded_and_continuous() {
        let ctx = NoiseContext::default();
        assert_eq!(ctx.seed().as_str(), DEFAULT_SEED);

        for i in 0..1000 {
            let x = i as f64 * 0.1;
            let z = i as f64 * 0.07;
            let v = ctx.sample(x, z);
            assert!((-1.0..=1.0).contains(&v));

            let dv = (ctx.sample(x + 0.001, z) - v).abs();
            assert!(dv < 0.05, "jump of {dv} at ({x}, {z})");
        }
    }

    #[test]
    fn test_empty_seed_is_valid() {
        let ctx = NoiseContext::new("");
        assert_eq!(ctx.seed_hash(), 0);
        let v = ctx.sample(0.5, 0.5);
        assert!((-1.0..=1.0).contains(&v));
    }

    #[test]
    fn test_integer_seeds_hash_their_decimal_form() {
        assert_eq!(WorldSeed::from(42i64).hash(), hash_seed("42"));
        assert_eq!(WorldSeed::from(7u64).as_str(), "7");
    }
}
