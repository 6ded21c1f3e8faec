//! Artifact integrity verification
//!
//! Computes the content digest of a staged file and checks it against the
//! digest the registry published. The registry carries npm-style `shasum`
//! values, which are SHA-1 hex.

use brokkr_core::{Error, Result};
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Chunk size for digest computation (1MB)
const DIGEST_CHUNK_SIZE: usize = 1024 * 1024;

/// Compute the lowercase hex SHA-1 digest of a file, streamed
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; DIGEST_CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Check a staged file against the expected digest
///
/// Comparison is case-insensitive; a mismatch fails with the integrity error
/// carrying both digests.
pub fn verify_digest(path: &Path, expected: &str) -> Result<()> {
    let actual = file_digest(path)?;
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(Error::integrity(expected, actual))
    }
}
