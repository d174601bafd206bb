//! Bid and price amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// An amount of ether, stored as whole gwei.
///
/// Integer gwei keeps price comparisons exact; the dashboard never needs
/// sub-gwei precision.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Gwei(pub u64);

impl Gwei {
    /// Gwei in one ether.
    pub const PER_ETH: u64 = 1_000_000_000;

    /// Zero amount.
    pub const ZERO: Self = Gwei(0);

    /// Amount from milli-ether (0.001 ETH units).
    pub const fn from_milli_eth(milli: u64) -> Self {
        Gwei(milli * (Self::PER_ETH / 1_000))
    }

    /// Get the raw gwei value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Value in ether as a float, for display and statistics only.
    pub fn as_eth(self) -> f64 {
        self.0 as f64 / Self::PER_ETH as f64
    }

    /// Multiply by `numerator / denominator`, rounding down.
    pub fn scale(self, numerator: u64, denominator: u64) -> Self {
        debug_assert!(denominator > 0, "scale denominator must be positive");
        Gwei(((self.0 as u128 * numerator as u128) / denominator as u128) as u64)
    }

    /// Saturating addition.
    pub fn saturating_add(self, other: Gwei) -> Self {
        Gwei(self.0.saturating_add(other.0))
    }
}

impl Sub for Gwei {
    type Output = Gwei;

    fn sub(self, rhs: Gwei) -> Gwei {
        Gwei(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Gwei {
    /// Formats as ether with trailing zeros trimmed, keeping at least three
    /// decimals: `0.001 ETH`, `0.045123 ETH`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::PER_ETH;
        let frac = format!("{:09}", self.0 % Self::PER_ETH);
        let trimmed = frac.trim_end_matches('0');
        let decimals = if trimmed.len() < 3 { &frac[..3] } else { trimmed };
        write!(f, "{}.{} ETH", whole, decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milli_eth() {
        assert_eq!(Gwei::from_milli_eth(1), Gwei(1_000_000));
        assert_eq!(Gwei::from_milli_eth(1000), Gwei(Gwei::PER_ETH));
    }

    #[test]
    fn test_scale_rounds_down() {
        assert_eq!(Gwei(10).scale(4, 5), Gwei(8));
        assert_eq!(Gwei(11).scale(4, 5), Gwei(8));
        assert_eq!(Gwei(u64::MAX).scale(1, 1), Gwei(u64::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(Gwei::from_milli_eth(1).to_string(), "0.001 ETH");
        assert_eq!(Gwei(45_123_000).to_string(), "0.045123 ETH");
        assert_eq!(Gwei(1_500_000_000).to_string(), "1.500 ETH");
        assert_eq!(Gwei::ZERO.to_string(), "0.000 ETH");
    }

    #[test]
    fn test_sub_saturates() {
        assert_eq!(Gwei(3) - Gwei(5), Gwei::ZERO);
    }
}
