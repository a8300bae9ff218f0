//! Deterministic random source for sketch jitter.
//!
//! Every jittered coordinate in a drawable is drawn from one of these, in a
//! fixed order, so a seed fully determines the output geometry.
//!
//! ## Modes
//!
//! - **Seeded**: `RandomSource::new(seed)`. The same seed always yields the
//!   same sequence, across runs and across implementations of the same
//!   generator.
//! - **Entropy**: `RandomSource::from_entropy()`. A fresh seed is drawn from
//!   the thread RNG. Output still varies plausibly but is not reproducible
//!   unless the caller records `seed()` and replays it.

use rand::Rng as _;

use crate::error::{Error, Result};

/// Park–Miller modulus, 2^31 - 1.
const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 48_271;

/// A minimal-standard Lehmer generator.
///
/// # Example
/// ```
/// use roughen::rng::RandomSource;
///
/// let mut rng = RandomSource::new(12345).unwrap();
/// let value = rng.next_f64(); // Returns value in [0, 1)
/// assert!(value >= 0.0 && value < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u32,
    state: u64,
    reproducible: bool,
}

impl RandomSource {
    /// Create a seeded source.
    ///
    /// Seeds `0` and `2^31 - 1` would pin the generator at zero forever; they
    /// are rejected instead of being replaced by another value.
    pub fn new(seed: u32) -> Result<Self> {
        validate_seed(seed)?;
        Ok(Self { seed, state: seed as u64, reproducible: true })
    }

    /// Create a source seeded from entropy. Not reproducible across runs.
    pub fn from_entropy() -> Self {
        let seed = new_seed();
        Self { seed, state: seed as u64, reproducible: false }
    }

    /// The seed this source started from, also in entropy mode.
    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn is_reproducible(&self) -> bool {
        self.reproducible
    }

    /// Get a random f64 in the range [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Get a random f64 in the range [min, max).
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Roughness-scaled value in `[min, max)`.
    #[inline]
    pub fn offset_range(&mut self, min: f64, max: f64, roughness: f64, gain: f64) -> f64 {
        roughness * gain * self.next_range(min, max)
    }

    /// Roughness-scaled value in `[-x, x)`.
    #[inline]
    pub fn offset(&mut self, x: f64, roughness: f64, gain: f64) -> f64 {
        self.offset_range(-x, x, roughness, gain)
    }
}

/// A fresh seed in `[1, 2^31 - 1)`, always accepted by [`RandomSource::new`].
pub fn new_seed() -> u32 {
    rand::rng().random_range(1..MODULUS as u32)
}

pub(crate) fn validate_seed(seed: u32) -> Result<()> {
    if seed == 0 || seed as u64 >= MODULUS {
        return Err(Error::option(
            "seed",
            format!("{seed} is outside 1..{MODULUS}; the generator would stall at zero"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let mut rng1 = RandomSource::new(42).unwrap();
        let mut rng2 = RandomSource::new(42).unwrap();

        for _ in 0..100 {
            assert_eq!(rng1.next_f64(), rng2.next_f64());
        }
    }

    #[test]
    fn known_sequence() {
        // 48271 / (2^31 - 1), then 48271^2 mod (2^31 - 1)
        let mut rng = RandomSource::new(1).unwrap();
        assert_eq!(rng.next_f64(), 48271.0 / 2147483647.0);
        assert_eq!(rng.next_f64(), 182605794.0 / 2147483647.0);
    }

    #[test]
    fn different_seeds_differ() {
        let mut rng1 = RandomSource::new(1).unwrap();
        let mut rng2 = RandomSource::new(2).unwrap();

        let vals1: Vec<_> = (0..10).map(|_| rng1.next_f64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_f64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn f64_in_range() {
        let mut rng = RandomSource::new(12345).unwrap();
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn offset_scales_with_roughness() {
        let mut rng = RandomSource::new(7).unwrap();
        for _ in 0..1000 {
            let v = rng.offset(2.0, 0.5, 1.0);
            assert!((-1.0..1.0).contains(&v));
        }
        assert_eq!(rng.offset(2.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn stalling_seeds_rejected() {
        assert!(matches!(RandomSource::new(0), Err(Error::InvalidOption { field: "seed", .. })));
        assert!(RandomSource::new(2_147_483_647).is_err());
        assert!(RandomSource::new(2_147_483_646).is_ok());
    }

    #[test]
    fn entropy_mode_records_seed() {
        let rng = RandomSource::from_entropy();
        assert!(!rng.is_reproducible());
        assert!(RandomSource::new(rng.seed()).is_ok());
    }

    #[test]
    fn new_seed_in_range() {
        for _ in 0..100 {
            let s = new_seed();
            assert!(s >= 1 && (s as u64) < MODULUS);
        }
    }
}
