//! Per-trial random sources. SplitMix64 spreads (run seed, trial index) into a trial seed,
//! and each trial draws from its own ChaCha8 stream seeded with it.
//! Deterministic: same run seed and trial index produce the same stream.
//! Not cryptographically secure.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Random source handed to the sampler for one trial.
pub type TrialRng = ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
pub struct SeedSequence {
    state: u64,
}

impl SeedSequence {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// The value `index + 1` calls to [SeedSequence::next_u64] would return, computed in O(1).
    /// Lets parallel workers derive their trial seed without walking the sequence.
    pub fn nth(seed: u64, index: u64) -> u64 {
        let mut jumped = Self::new(seed.wrapping_add(SPLITMIX64_GOLDEN.wrapping_mul(index)));
        jumped.next_u64()
    }
}

/// Independent random source for trial `trial_index` of a run seeded with `run_seed`.
pub fn trial_rng(run_seed: u64, trial_index: usize) -> TrialRng {
    ChaCha8Rng::seed_from_u64(SeedSequence::nth(run_seed, trial_index as u64))
}
