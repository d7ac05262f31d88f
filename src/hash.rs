//! BLAKE3 hashing utilities for stable source identifiers

use blake3::Hasher;

/// Number of hex characters kept from the digest
pub const ID_LEN: usize = 16;

/// Hash an ordered tuple of optional parts into a short hex id
///
/// Each part is prefixed with a presence tag and terminated with a null
/// separator, so `(Some("a"), None)` and `(None, Some("a"))` never collide.
pub fn stable_id(parts: &[Option<&str>]) -> String {
    let mut hasher = Hasher::new();
    for part in parts {
        match part {
            Some(value) => {
                hasher.update(b"1");
                hasher.update(value.as_bytes());
            }
            None => {
                hasher.update(b"0");
            }
        }
        hasher.update(b"\0");
    }
    let hex = hasher.finalize().to_hex();
    hex[..ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_id_deterministic() {
        let a = stable_id(&[Some("https://github.com/acme/tools"), None, None]);
        let b = stable_id(&[Some("https://github.com/acme/tools"), None, None]);
        assert_eq!(a, b);
        assert_eq!(a.len(), ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_stable_id_position_sensitive() {
        let branch = stable_id(&[Some("u"), Some("main"), None]);
        let path = stable_id(&[Some("u"), None, Some("main")]);
        assert_ne!(branch, path);
    }

    #[test]
    fn test_stable_id_distinguishes_empty_from_missing() {
        assert_ne!(
            stable_id(&[Some("u"), Some("")]),
            stable_id(&[Some("u"), None])
        );
    }
}
