//! SHA-256 checksums computed while content streams past.

use sha2::{Digest, Sha256};

/// Incremental SHA-256 and byte counter.
#[derive(Debug, Clone, Default)]
pub struct ChecksumHasher {
    hasher: Sha256,
    len: u64,
}

impl ChecksumHasher {
    /// Start a new checksum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.len += chunk.len() as u64;
    }

    /// Bytes seen so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether no bytes have been fed yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Consume the hasher, returning the byte count and hex digest.
    pub fn finish(self) -> (u64, String) {
        (self.len, hex::encode(self.hasher.finalize()))
    }
}

/// Hex SHA-256 of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = ChecksumHasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        let (len, digest) = hasher.finish();
        assert_eq!(len, 11);
        assert_eq!(digest, sha256_hex(b"hello world"));
    }
}
