//! Domain Value Objects
//!
//! Immutable value types for the PoW domain.

use std::fmt;
use std::str::FromStr;

/// Difficulty of a challenge, in leading zero bits of the answer hash
///
/// Policies may declare difficulty in hex nibbles (`PoW=5`, five leading `0`
/// hex digits, 20 bits) or in bits (`PoW=18b`). Both are normalised to bits
/// here; nothing downstream ever sees the nibble form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u16);

impl Difficulty {
    /// A SHA-256 digest has 256 bits
    pub const MAX_BITS: u16 = 256;
    /// Suffix selecting the bit encoding
    pub const BITS_SUFFIX: char = 'b';

    pub fn from_bits(bits: u16) -> Option<Self> {
        (bits <= Self::MAX_BITS).then_some(Self(bits))
    }

    /// Parse the `PoW` policy option
    ///
    /// Returns `None` when the option does not demand work: absent digits,
    /// zero, or a negative value. The numeric part is read like a lenient
    /// integer parse (optional `+`, then leading digits), and values beyond 256 bits are
    /// clamped to 256 so an oversized policy stays gated instead of open.
    pub fn from_policy(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let unsigned = raw.strip_prefix('+').unwrap_or(raw);
        let digits: String = unsigned
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return None;
        }

        // Saturate rather than overflow on absurd inputs like "99999999999"
        let level: u64 = digits.parse().unwrap_or(u64::MAX);
        if level == 0 {
            return None;
        }

        let bits = if raw.ends_with(Self::BITS_SUFFIX) {
            level
        } else {
            level.saturating_mul(4)
        };

        Some(Self(bits.min(u64::from(Self::MAX_BITS)) as u16))
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Number of whole leading bytes that must be zero
    pub fn zero_bytes(&self) -> usize {
        usize::from(self.0 / 8)
    }

    /// Number of high-order bits of the following byte that must be zero
    pub fn remaining_bits(&self) -> u8 {
        (self.0 % 8) as u8
    }

    /// Expected number of hash attempts to find a solution (`2^bits`)
    pub fn expected_hashes(&self) -> f64 {
        2f64.powi(i32::from(self.0))
    }
}

impl From<Difficulty> for u16 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}

/// Quantile factor of the exponential solve-time distribution
///
/// Solving is a geometric race, approximately exponential with mean
/// `2^bits / hashrate`. The `q` quantile of that distribution is
/// `-ln(1 - q)` times the mean.
pub const FACTOR_MEDIAN: f64 = std::f64::consts::LN_2;
pub const FACTOR_90: f64 = std::f64::consts::LN_10;

/// Assumed client hash rate tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashrateTier {
    /// Slowest supported device
    Min,
    /// Typical device
    Avg,
}

/// Strategy for turning difficulty into a challenge lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryStrategy {
    /// 90% of minimum-hashrate devices finish in time (`T90_AT_200KH`)
    #[default]
    Conservative,
    /// 90% of average-hashrate devices finish in time (`T90_AT_300KH`)
    Balanced,
    /// Half of average-hashrate devices finish in time (`MEDIAN_AT_300KH`)
    Strict,
}

impl ExpiryStrategy {
    pub fn factor(&self) -> f64 {
        match self {
            ExpiryStrategy::Conservative | ExpiryStrategy::Balanced => FACTOR_90,
            ExpiryStrategy::Strict => FACTOR_MEDIAN,
        }
    }

    pub fn hashrate_tier(&self) -> HashrateTier {
        match self {
            ExpiryStrategy::Conservative => HashrateTier::Min,
            ExpiryStrategy::Balanced | ExpiryStrategy::Strict => HashrateTier::Avg,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStrategy::Conservative => "T90_AT_200KH",
            ExpiryStrategy::Balanced => "T90_AT_300KH",
            ExpiryStrategy::Strict => "MEDIAN_AT_300KH",
        }
    }
}

/// Error when parsing an [`ExpiryStrategy`] name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown PoW expiry strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for ExpiryStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t90_at_200kh" | "conservative" => Ok(ExpiryStrategy::Conservative),
            "t90_at_300kh" | "balanced" => Ok(ExpiryStrategy::Balanced),
            "median_at_300kh" | "strict" => Ok(ExpiryStrategy::Strict),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Full parameter set of the expiry model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpiryModel {
    pub strategy: ExpiryStrategy,
    pub hashrate_min: f64,
    pub hashrate_avg: f64,
    pub min_expiry_secs: u32,
    pub max_expiry_secs: u32,
}

impl ExpiryModel {
    pub fn assumed_hashrate(&self) -> f64 {
        match self.strategy.hashrate_tier() {
            HashrateTier::Min => self.hashrate_min,
            HashrateTier::Avg => self.hashrate_avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_nibble_encoding() {
        assert_eq!(Difficulty::from_policy("8").map(|d| d.bits()), Some(32));
        assert_eq!(Difficulty::from_policy("1").map(|d| d.bits()), Some(4));
        assert_eq!(Difficulty::from_policy(" 5 ").map(|d| d.bits()), Some(20));
        assert_eq!(Difficulty::from_policy("+5").map(|d| d.bits()), Some(20));
        assert_eq!(Difficulty::from_policy("+12b").map(|d| d.bits()), Some(12));
    }

    #[test]
    fn test_bit_encoding() {
        assert_eq!(Difficulty::from_policy("12b").map(|d| d.bits()), Some(12));
        assert_eq!(Difficulty::from_policy("1b").map(|d| d.bits()), Some(1));
    }

    #[test]
    fn test_no_work_demanded() {
        assert_eq!(Difficulty::from_policy(""), None);
        assert_eq!(Difficulty::from_policy("0"), None);
        assert_eq!(Difficulty::from_policy("0b"), None);
        assert_eq!(Difficulty::from_policy("-3"), None);
        assert_eq!(Difficulty::from_policy("abc"), None);
        assert_eq!(Difficulty::from_policy("b"), None);
    }

    #[test]
    fn test_oversized_difficulty_is_clamped() {
        assert_eq!(Difficulty::from_policy("65").map(|d| d.bits()), Some(256));
        assert_eq!(Difficulty::from_policy("999b").map(|d| d.bits()), Some(256));
        assert_eq!(
            Difficulty::from_policy("99999999999999999999999").map(|d| d.bits()),
            Some(256)
        );
    }

    #[test]
    fn test_byte_split() {
        let d = Difficulty::from_bits(12).unwrap();
        assert_eq!(d.zero_bytes(), 1);
        assert_eq!(d.remaining_bits(), 4);

        let d = Difficulty::from_bits(256).unwrap();
        assert_eq!(d.zero_bytes(), 32);
        assert_eq!(d.remaining_bits(), 0);

        assert!(Difficulty::from_bits(257).is_none());
    }

    #[test]
    fn test_strategy_parameters() {
        assert!((FACTOR_90 - 2.302585).abs() < 1e-6);
        assert!((FACTOR_MEDIAN - 0.693147).abs() < 1e-6);

        assert_eq!(ExpiryStrategy::Conservative.hashrate_tier(), HashrateTier::Min);
        assert_eq!(ExpiryStrategy::Balanced.hashrate_tier(), HashrateTier::Avg);
        assert_eq!(ExpiryStrategy::Strict.factor(), FACTOR_MEDIAN);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("T90_AT_200KH".parse::<ExpiryStrategy>(), Ok(ExpiryStrategy::Conservative));
        assert_eq!("t90_at_300kh".parse::<ExpiryStrategy>(), Ok(ExpiryStrategy::Balanced));
        assert_eq!("MEDIAN_AT_300KH".parse::<ExpiryStrategy>(), Ok(ExpiryStrategy::Strict));
        assert_eq!("strict".parse::<ExpiryStrategy>(), Ok(ExpiryStrategy::Strict));
        assert!("T99".parse::<ExpiryStrategy>().is_err());
    }
}
