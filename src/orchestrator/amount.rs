//! Random amount selection.
//!
//! Amounts are drawn in micro-units (six decimal places) and converted to
//! wei, so `0.001..=0.01` yields values like `0.004217`.

use alloy::primitives::U256;
use rand::Rng;

use crate::config::AmountRangeConfig;

const MICRO_PER_UNIT: f64 = 1_000_000.0;
const WEI_PER_MICRO: u64 = 1_000_000_000_000;

/// Inclusive amount range in micro-units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    min_micro: u64,
    max_micro: u64,
}

impl AmountRange {
    pub fn new(min_micro: u64, max_micro: u64) -> Self {
        Self {
            min_micro: min_micro.min(max_micro),
            max_micro: max_micro.max(min_micro),
        }
    }

    /// Pick an amount uniformly within the range, in wei.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> U256 {
        let micro = rng.gen_range(self.min_micro..=self.max_micro);
        U256::from(micro) * U256::from(WEI_PER_MICRO)
    }

    pub fn min_wei(&self) -> U256 {
        U256::from(self.min_micro) * U256::from(WEI_PER_MICRO)
    }

    pub fn max_wei(&self) -> U256 {
        U256::from(self.max_micro) * U256::from(WEI_PER_MICRO)
    }
}

impl From<AmountRangeConfig> for AmountRange {
    fn from(config: AmountRangeConfig) -> Self {
        Self::new(to_micro(config.min), to_micro(config.max))
    }
}

fn to_micro(units: f64) -> u64 {
    (units * MICRO_PER_UNIT).round().max(0.0) as u64
}
