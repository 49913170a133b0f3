//! Synthetic training corpus.
//!
//! The classifier is illustrative: it is fitted on random data, not on clinical cases. The
//! corpus is generated from a fixed seed with a fully specified draw procedure so that the
//! fitted parameters are reproducible bit for bit:
//!
//! 1. Generator: ChaCha8 (`rand_chacha::ChaCha8Rng::seed_from_u64(seed)`).
//! 2. Features: `size × SYMPTOM_COUNT` cells drawn row-major, each the lowest bit of
//!    `next_u32()` (Bernoulli(0.5)).
//! 3. Labels: `size` draws taken after all features, each
//!    `(next_u32() as u64 * CONDITION_COUNT as u64) >> 32`. This multiply-shift mapping is
//!    exactly uniform because `CONDITION_COUNT` is a power of two.

use crate::catalog::{CONDITION_COUNT, SYMPTOM_COUNT};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One synthetic example: a binary feature row and a class index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub features: [u8; SYMPTOM_COUNT],
    pub label: usize,
}

/// The generated training set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingCorpus {
    examples: Vec<Example>,
}

impl TrainingCorpus {
    /// Generates `size` examples from `seed`.
    pub fn generate(seed: u64, size: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut rows = Vec::with_capacity(size);
        for _ in 0..size {
            let mut features = [0u8; SYMPTOM_COUNT];
            for cell in features.iter_mut() {
                *cell = (rng.next_u32() & 1) as u8;
            }
            rows.push(features);
        }

        let examples = rows
            .into_iter()
            .map(|features| Example {
                features,
                label: uniform_index(&mut rng, CONDITION_COUNT),
            })
            .collect();

        Self { examples }
    }

    /// Wraps hand-built examples, e.g. to fit a classifier on known data.
    pub fn from_examples(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

fn uniform_index(rng: &mut ChaCha8Rng, n: usize) -> usize {
    ((u64::from(rng.next_u32()) * n as u64) >> 32) as usize
}
