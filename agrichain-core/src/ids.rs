//! Id generation, synthetic ledger hashes, and loose id equality.

use chrono::Utc;
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fresh collection-unique id: `<prefix>-<epoch_millis>-<9 random chars>`.
/// The random suffix avoids collisions between calls in the same millisecond.
pub fn new_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Opaque `0x` + 64 hex chars standing in for a distributed-ledger
/// transaction id. Carries no cryptographic meaning.
pub fn ledger_hash() -> String {
    let mut rng = rand::thread_rng();
    let mut hash = String::with_capacity(66);
    hash.push_str("0x");
    for _ in 0..64 {
        hash.push(char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'));
    }
    hash
}

/// Loose id equality: exact string match, or both sides parse as the same
/// integer. Callers may hand ids over as either strings or numbers.
pub fn ids_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
