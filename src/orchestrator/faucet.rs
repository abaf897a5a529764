//! Faucet eligibility.

use std::fmt;

use crate::api::FaucetStatusData;

/// Whether the faucet can be claimed now, and if not, when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaucetStatus {
    pub available: bool,
    /// Unix seconds of the next allowed claim.
    pub next_available_at: i64,
}

impl FaucetStatus {
    /// Time left until the next claim, measured from `now` (unix seconds).
    pub fn remaining(&self, now: i64) -> Remaining {
        Remaining((self.next_available_at - now).max(0) as u64)
    }
}

impl From<FaucetStatusData> for FaucetStatus {
    fn from(data: FaucetStatusData) -> Self {
        Self {
            available: data.is_able_to_faucet,
            next_available_at: data.available_timestamp,
        }
    }
}

/// A wait in whole seconds, displayed as `1h 1m 1s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining(pub u64);

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{}h {}m {}s", hours, minutes, seconds)
    }
}

/// Result of a claim attempt that reached the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    /// Status said no; the claim endpoint was not called.
    NotEligible(FaucetStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_formats_hours_minutes_seconds() {
        let status = FaucetStatus {
            available: false,
            next_available_at: 1_700_000_000,
        };
        let remaining = status.remaining(1_700_000_000 - 3661);
        assert_eq!(remaining, Remaining(3661));
        assert_eq!(remaining.to_string(), "1h 1m 1s");
    }

    #[test]
    fn test_remaining_never_negative() {
        let status = FaucetStatus {
            available: false,
            next_available_at: 100,
        };
        assert_eq!(status.remaining(200).to_string(), "0h 0m 0s");
    }

    #[test]
    fn test_from_wire() {
        let status = FaucetStatus::from(FaucetStatusData {
            is_able_to_faucet: true,
            available_timestamp: 5,
        });
        assert!(status.available);
        assert_eq!(status.next_available_at, 5);
    }
}
