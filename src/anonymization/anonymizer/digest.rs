//! Salted SHA-256 digests

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Lower-case hex SHA-256 of `"{salt}:{original}"`
pub fn salted_digest(salt: &str, original: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(original.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Integer read from the first eight hex characters of a digest
pub fn digest_prefix_u32(digest: &str) -> u32 {
    digest
        .get(..8)
        .and_then(|prefix| u32::from_str_radix(prefix, 16).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = salted_digest("salt", "value");
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digest_matches_joined_input() {
        let mut hasher = Sha256::new();
        hasher.update(b"test_salt:patient123");
        let expected = format!("{:x}", hasher.finalize());
        assert_eq!(salted_digest("test_salt", "patient123"), expected);
    }

    #[test]
    fn test_salt_changes_digest() {
        assert_ne!(salted_digest("a", "value"), salted_digest("b", "value"));
    }

    #[test]
    fn test_digest_prefix() {
        assert_eq!(digest_prefix_u32("0000000a-rest"), 10);
        assert_eq!(digest_prefix_u32("ffffffff"), u32::MAX);
        assert_eq!(digest_prefix_u32("short"), 0);
    }
}
