//! Exclusion sampling
//!
//! Withholds a percentage of whole stories (all steps of one `##` block in
//! one file) from the graph. Each story draws independently from an RNG
//! seeded by the sampler seed and the story key, so the decision for a
//! story does not depend on which other stories or files are loaded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use dialogue_import_core::{ImportError, Result};

#[derive(Debug, Clone, Copy)]
pub struct ExclusionSampler {
    percentage: u8,
    seed: u64,
}

impl ExclusionSampler {
    /// Sampler dropping `percentage` (0..=100) of stories
    pub fn new(percentage: u8, seed: u64) -> Result<Self> {
        if percentage > 100 {
            return Err(ImportError::invalid_argument(
                "exclusion_percentage",
                format!("{} is not within 0..=100", percentage),
            ));
        }
        Ok(Self { percentage, seed })
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Whether the story identified by `story_key` is withheld
    pub fn is_excluded(&self, story_key: &str) -> bool {
        match self.percentage {
            0 => false,
            100 => true,
            pct => {
                let mut rng = StdRng::seed_from_u64(self.seed ^ story_hash(story_key));
                rng.gen_range(0.0..100.0) < f64::from(pct)
            }
        }
    }
}

fn story_hash(story_key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    story_key.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("data/stories.md#{}", i)).collect()
    }

    #[test]
    fn test_bounds() {
        let none = ExclusionSampler::new(0, 42).unwrap();
        let all = ExclusionSampler::new(100, 42).unwrap();
        for key in keys(50) {
            assert!(!none.is_excluded(&key));
            assert!(all.is_excluded(&key));
        }
        assert!(ExclusionSampler::new(101, 42).is_err());
    }

    #[test]
    fn test_reproducible_per_seed() {
        let a = ExclusionSampler::new(50, 7).unwrap();
        let b = ExclusionSampler::new(50, 7).unwrap();
        let decisions_a: Vec<bool> = keys(100).iter().map(|k| a.is_excluded(k)).collect();
        let decisions_b: Vec<bool> = keys(100).iter().rev().map(|k| b.is_excluded(k)).collect();
        let reversed: Vec<bool> = decisions_b.into_iter().rev().collect();
        assert_eq!(decisions_a, reversed);
    }

    #[test]
    fn test_roughly_proportional() {
        let sampler = ExclusionSampler::new(30, 42).unwrap();
        let excluded = keys(1000).iter().filter(|k| sampler.is_excluded(k)).count();
        assert!((200..400).contains(&excluded), "excluded {}", excluded);
    }
}
