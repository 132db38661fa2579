use sha2::{Digest, Sha256};

use crate::stats::GameStats;

/// Mixing constant taken from the game client.
const MULTIPLIER: u64 = 0x178b_a575_48d;

/// JavaScript `Number.MAX_SAFE_INTEGER` (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Compute the anti-cheat hash the server expects alongside a game result.
///
/// The integer accumulation is exact; the final reduction deliberately runs
/// through IEEE double multiply/modulo because that is what the game client
/// does — the product overflows 2^53 and the precision loss is part of the
/// wire format. `char_sum` walks the address exactly as given (checksum
/// casing included), while the hashed base string lowercases it.
pub fn anti_cheat_hash(address: &str, stats: &GameStats) -> String {
    let length = i64::from(stats.correct_chars) + i64::from(stats.incorrect_chars);
    let mut n = 23 * i64::from(stats.wpm)
        + 89 * i64::from(stats.accuracy)
        + 41 * i64::from(stats.time)
        + 67 * i64::from(stats.correct_chars)
        + 13 * i64::from(stats.incorrect_chars)
        + 97 * length;

    let char_sum: i64 = address
        .chars()
        .enumerate()
        .map(|(i, c)| (c as i64) * (i as i64 + 1))
        .sum();
    n += 31 * char_sum;

    let checksum = ((MULTIPLIER as f64 * n as f64) % MAX_SAFE_INTEGER) as u64;

    let base = format!(
        "{}_{}_{}_{}_{}_{}_{}",
        address.to_lowercase(),
        stats.wpm,
        stats.accuracy,
        stats.time,
        stats.correct_chars,
        stats.incorrect_chars,
        checksum
    );

    let digest = Sha256::digest(base.as_bytes());
    hex::encode(digest)[..32].to_string()
}
