//! Domain Services
//!
//! Pure domain logic for PoW: answer hashing, bit-prefix checking, the
//! difficulty-to-expiry model, and a reference solver.

use sha2::{Digest, Sha256};

use crate::domain::value_objects::{Difficulty, ExpiryModel};

/// Compute SHA-256 of the challenge token followed by the nonce text
///
/// The client appends the nonce as it was submitted (for numeric nonces, the
/// decimal rendering) to the token string and hashes the UTF-8 bytes.
pub fn compute_pow_hash(token: &str, nonce: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.update(nonce.as_bytes());
    hasher.finalize().into()
}

/// Check that a hash starts with the required number of zero bits
pub fn meets_difficulty(hash: &[u8; 32], difficulty: Difficulty) -> bool {
    let zero_bytes = difficulty.zero_bytes();
    let remaining_bits = difficulty.remaining_bits();

    if hash[..zero_bytes].iter().any(|&b| b != 0) {
        return false;
    }

    if remaining_bits > 0 && zero_bytes < hash.len() {
        let mask = (0xFFu16 << (8 - remaining_bits)) as u8;
        if hash[zero_bytes] & mask != 0 {
            return false;
        }
    }

    true
}

/// Count leading zero bits in a SHA-256 hash
pub fn count_leading_zero_bits(hash: &[u8; 32]) -> u16 {
    let mut count = 0u16;
    for &byte in hash {
        if byte == 0 {
            count += 8;
        } else {
            count += byte.leading_zeros() as u16;
            break;
        }
    }
    count
}

/// Verify a PoW answer against a token
pub fn verify_pow(token: &str, nonce: &str, difficulty: Difficulty) -> bool {
    meets_difficulty(&compute_pow_hash(token, nonce), difficulty)
}

/// Challenge lifetime in seconds for a difficulty
///
/// `factor * 2^bits / hashrate`, clamped to the configured bounds and rounded
/// to the nearest second. Degenerate inputs (zero hashrate, huge difficulty)
/// land on the upper bound.
pub fn compute_expiry_secs(difficulty: Difficulty, model: &ExpiryModel) -> u32 {
    let min = f64::from(model.min_expiry_secs);
    let max = f64::from(model.max_expiry_secs.max(model.min_expiry_secs));

    let raw = model.strategy.factor() * difficulty.expected_hashes() / model.assumed_hashrate();
    let secs = if raw.is_finite() { raw.clamp(min, max) } else { max };

    secs.round() as u32
}

/// Reference solver, mirroring the browser worker
///
/// Tries decimal nonces `start, start + 1, ...` for at most `max_attempts`
/// hashes. The token prefix is absorbed once and the hasher state cloned per
/// attempt.
pub fn solve(token: &str, difficulty: Difficulty, start: u64, max_attempts: u64) -> Option<u64> {
    let mut prefix = Sha256::new();
    prefix.update(token.as_bytes());

    let end = start.saturating_add(max_attempts);
    (start..end).find(|nonce| {
        let mut hasher = prefix.clone();
        hasher.update(nonce.to_string().as_bytes());
        let hash: [u8; 32] = hasher.finalize().into();
        meets_difficulty(&hash, difficulty)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ExpiryStrategy;

    fn bits(n: u16) -> Difficulty {
        Difficulty::from_bits(n).unwrap()
    }

    fn model(strategy: ExpiryStrategy) -> ExpiryModel {
        ExpiryModel {
            strategy,
            hashrate_min: 200_000.0,
            hashrate_avg: 300_000.0,
            min_expiry_secs: 15,
            max_expiry_secs: 1800,
        }
    }

    #[test]
    fn test_twelve_bit_prefix() {
        // 1 full zero byte + 4 zero bits
        let mut hash = [0xFFu8; 32];
        hash[0] = 0x00;
        hash[1] = 0x0F;
        assert!(meets_difficulty(&hash, bits(12)));

        hash[1] = 0x1F;
        assert!(!meets_difficulty(&hash, bits(12)));
    }

    #[test]
    fn test_bits_not_bytes() {
        let mut hash = [0u8; 32];
        hash[2] = 0x01; // 23 zero bits (8 + 8 + 7)
        assert!(meets_difficulty(&hash, bits(23)));
        assert!(!meets_difficulty(&hash, bits(24)));
        assert_eq!(count_leading_zero_bits(&hash), 23);
    }

    #[test]
    fn test_zero_and_full_difficulty() {
        let hash = [0xFFu8; 32];
        assert!(meets_difficulty(&hash, bits(0)));
        assert!(!meets_difficulty(&hash, bits(1)));

        let zeros = [0u8; 32];
        assert!(meets_difficulty(&zeros, bits(256)));
        assert_eq!(count_leading_zero_bits(&zeros), 256);
    }

    #[test]
    fn test_pow_hash_is_token_then_nonce() {
        let hash = compute_pow_hash("abc", "123");
        let expected: [u8; 32] = Sha256::digest(b"abc123").into();
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_expiry_clamped_at_bounds() {
        let m = model(ExpiryStrategy::Conservative);
        assert_eq!(compute_expiry_secs(bits(0), &m), 15);
        assert_eq!(compute_expiry_secs(bits(32), &m), 1800);
        assert_eq!(compute_expiry_secs(bits(256), &m), 1800);
    }

    #[test]
    fn test_expiry_in_range() {
        // 2.302585 * 2^24 / 200_000 = 193.16 -> 193
        assert_eq!(compute_expiry_secs(bits(24), &model(ExpiryStrategy::Conservative)), 193);
        // 2.302585 * 2^24 / 300_000 = 128.77 -> 129
        assert_eq!(compute_expiry_secs(bits(24), &model(ExpiryStrategy::Balanced)), 129);
        // 0.693147 * 2^24 / 300_000 = 38.76 -> 39
        assert_eq!(compute_expiry_secs(bits(24), &model(ExpiryStrategy::Strict)), 39);
    }

    #[test]
    fn test_expiry_zero_hashrate() {
        let mut m = model(ExpiryStrategy::Balanced);
        m.hashrate_avg = 0.0;
        assert_eq!(compute_expiry_secs(bits(0), &m), 1800);
        assert_eq!(compute_expiry_secs(bits(20), &m), 1800);
    }

    #[test]
    fn test_solve_finds_valid_nonce() {
        let token = "header.payload.signature";
        let nonce = solve(token, bits(8), 0, 1_000_000).expect("8 bits is cheap");
        assert!(verify_pow(token, &nonce.to_string(), bits(8)));
    }

    #[test]
    fn test_solve_gives_up() {
        assert_eq!(solve("token", bits(256), 0, 16), None);
    }
}
