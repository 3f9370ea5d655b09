//! Cryptographic utilities for API key hashing.

use sha2::{Digest, Sha256};

/// Prefix every dispatch API key starts with.
pub const API_KEY_PREFIX: &str = "dk_";

/// Minimum API key length (prefix + 8 identifying characters).
pub const MIN_API_KEY_LENGTH: usize = 11;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns true if the key has the dispatch prefix and the minimum length.
pub fn is_well_formed_key(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX) && key.len() >= MIN_API_KEY_LENGTH
}

/// Extracts the identifying prefix from an API key (first 8 characters after "dk_").
pub fn extract_key_prefix(key: &str) -> Option<&str> {
    if is_well_formed_key(key) {
        key.get(API_KEY_PREFIX.len()..MIN_API_KEY_LENGTH)
    } else {
        None
    }
}
