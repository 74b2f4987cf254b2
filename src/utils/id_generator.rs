//! Link identifier generation.
//!
//! Identifiers are a base36 millisecond timestamp followed by a random base36
//! suffix, so they sort roughly by creation time and stay URL-safe.

use chrono::Utc;
use rand::Rng;

/// Number of random base36 characters appended after the timestamp.
const RANDOM_SUFFIX_LEN: usize = 10;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a new opaque link identifier.
///
/// # Examples
///
/// ```ignore
/// let id = generate_link_id();
/// assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
/// ```
pub fn generate_link_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut id = to_base36(millis);

    let mut rng = rand::rng();
    id.extend((0..RANDOM_SUFFIX_LEN).map(|_| {
        let idx = rng.random_range(0..BASE36_ALPHABET.len());
        BASE36_ALPHABET[idx] as char
    }));

    id
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).into_owned()
}
