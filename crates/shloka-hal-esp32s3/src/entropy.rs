//! Hardware entropy source.

use esp_hal::rng::Rng;
use shloka_core::entropy::EntropySource;

/// Verse selection entropy from the SoC random number generator.
#[derive(Clone, Copy, Debug)]
pub struct HardwareEntropy {
    rng: Rng,
}

impl HardwareEntropy {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl EntropySource for HardwareEntropy {
    fn next_u32(&mut self) -> u32 {
        self.rng.random()
    }
}
