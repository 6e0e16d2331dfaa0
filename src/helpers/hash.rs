//! File checksum helpers
//!
//! Streams files through SHA-256 or SHA-512 in fixed-size chunks so memory
//! use does not depend on the file size.

use crate::error::{Error, Result};
use sha2::Digest;
use std::io::Read;
use std::path::Path;

/// Chunk size for reading files during hashing (10 KiB)
const CHUNK_SIZE: usize = 10 * 1024;

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

/// Hex digest of everything `reader` yields.
fn hash_reader<D: Digest>(reader: &mut impl Read) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the hex digest of a file.
pub fn file_hash(path: &Path, algorithm: HashAlgorithm) -> std::io::Result<String> {
    let mut f = std::fs::File::open(path)?;
    match algorithm {
        HashAlgorithm::Sha256 => hash_reader::<sha2::Sha256>(&mut f),
        HashAlgorithm::Sha512 => hash_reader::<sha2::Sha512>(&mut f),
    }
}

/// Compute the SHA-256 hex digest of a file.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    file_hash(path, HashAlgorithm::Sha256)
}

/// Verify a file's hash against an expected value (case-insensitive).
///
/// # Example
/// ```ignore
/// verify_file_hash(Path::new("sqlcipher-3.4.1.tar.gz"), "abc123...", HashAlgorithm::Sha256)?;
/// ```
pub fn verify_file_hash(path: &Path, expected: &str, algorithm: HashAlgorithm) -> Result<()> {
    let actual = file_hash(path, algorithm)?;
    let expected = expected.trim().to_lowercase();

    if actual != expected {
        return Err(Error::ChecksumMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }

    Ok(())
}
