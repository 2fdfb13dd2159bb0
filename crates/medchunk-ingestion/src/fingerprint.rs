//! Content fingerprints for dedup and version tracking.

use sha2::{Digest, Sha256};

/// Hex digest length of a SHA-256 fingerprint.
pub const HASH_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of the exact UTF-8 bytes of `content`.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fingerprint of a whole raw document, used to skip re-ingesting a file.
pub fn document_hash(text: &str) -> String {
    content_hash(text)
}

pub fn is_content_hash(s: &str) -> bool {
    s.len() == HASH_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            content_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_identical_content_same_hash() {
        let body = "BP 120/80, HR 72.";
        assert_eq!(content_hash(body), content_hash(body));
        assert!(is_content_hash(&content_hash(body)));
    }

    #[test]
    fn test_single_char_difference() {
        assert_ne!(content_hash("HR 72"), content_hash("HR 73"));
        assert_ne!(content_hash("note"), content_hash("note "));
    }

    #[test]
    fn test_is_content_hash_rejects_bad_shapes() {
        assert!(!is_content_hash("abc"));
        assert!(!is_content_hash(&"G".repeat(64)));
        assert!(!is_content_hash(&"A".repeat(64)));
    }
}
