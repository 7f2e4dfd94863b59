//! Paylane Secure Form hash.
//!
//! Paylane authenticates both the redirect form and the notification it
//! posts back with `SHA1(salt|description|amount|currency|transaction_type)`,
//! hex encoded in lowercase.

use sha1::{Digest, Sha1};

pub fn outgoing_hash(
    salt: &str,
    description: &str,
    amount: &str,
    currency: &str,
    transaction_type: &str,
) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{salt}|{description}|{amount}|{currency}|{transaction_type}").as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a recomputed hash with the one supplied by the gateway.
///
/// Runs in time independent of where the first differing byte is.
pub fn hashes_match(expected: &str, supplied: &str) -> bool {
    if expected.len() != supplied.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in expected.bytes().zip(supplied.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
