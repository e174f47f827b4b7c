//! SHA-256 verification of downloaded and local sources.

use std::fs::File;
use std::io::{self, BufReader};

use camino::Utf8Path;
use sha2::{Digest, Sha256};

use crate::error::VsInstallError;

/// Computes the lowercase hex SHA-256 of the file at `path`.
pub fn sha256_file(path: &Utf8Path) -> Result<String, VsInstallError> {
    let file = File::open(path)
        .map_err(|e| VsInstallError::io(format!("failed to open for hashing: {}", path), e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)
        .map_err(|e| VsInstallError::io(format!("failed to read for hashing: {}", path), e))?;
    let digest = hasher.finalize();
    Ok(digest.iter().map(|byte| format!("{:02x}", byte)).collect())
}

/// Fails with [`VsInstallError::Checksum`] unless `path` hashes to `expected`.
///
/// Comparison ignores case.
pub fn verify_checksum(path: &Utf8Path, expected: &str) -> Result<(), VsInstallError> {
    let actual = sha256_file(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(VsInstallError::Checksum {
            path: path.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    tracing::debug!("checksum verified: {}", path);
    Ok(())
}

/// Returns true if `path` exists and matches `expected`.
pub fn matches_checksum(path: &Utf8Path, expected: &str) -> bool {
    path.is_file()
        && sha256_file(path)
            .map(|actual| actual.eq_ignore_ascii_case(expected.trim()))
            .unwrap_or(false)
}
