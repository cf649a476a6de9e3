//! Code hashing seam.
//!
//! The plaintext code is never persisted; the store only ever sees the
//! salted hash produced here.

use sha2::{Digest, Sha256};

/// Hash function applied to `salt + code` before persistence
pub trait CodeHasher: Send + Sync {
    /// Compute the stored digest for a salt/code pair
    fn hash(&self, salt: &str, code: &str) -> String;
}

/// Hex-encoded SHA-256 of the salt concatenated with the code
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256CodeHasher;

impl CodeHasher for Sha256CodeHasher {
    fn hash(&self, salt: &str, code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(code.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let hasher = Sha256CodeHasher;
        assert_eq!(hasher.hash("salt", "123456"), hasher.hash("salt", "123456"));
    }

    #[test]
    fn test_hash_depends_on_salt_and_code() {
        let hasher = Sha256CodeHasher;
        let base = hasher.hash("salt-a", "123456");
        assert_ne!(base, hasher.hash("salt-b", "123456"));
        assert_ne!(base, hasher.hash("salt-a", "123457"));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hasher = Sha256CodeHasher;
        let digest = hasher.hash("salt", "000000");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salt_code_concatenation_order() {
        // hash(salt, code) must equal sha256(salt || code), not the reverse
        let hasher = Sha256CodeHasher;
        let mut reference = Sha256::new();
        reference.update(b"mysalt123456");
        assert_eq!(hasher.hash("mysalt", "123456"), hex::encode(reference.finalize()));
    }
}
