use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::error::CodecError;
use crate::engine::hash::sha256_hex;
use crate::engine::{compress, decompress};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub original_bytes: u64,
    pub container_bytes: u64,
    pub original_sha256: String,
    pub restored_sha256: String,
    pub lossless: bool,
}

impl VerificationReport {
    fn build(original: &[u8], container_bytes: usize, restored: &[u8]) -> Self {
        let original_sha256 = sha256_hex(original);
        let restored_sha256 = sha256_hex(restored);
        let lossless = original_sha256 == restored_sha256 && original.len() == restored.len();

        if !lossless {
            warn!("Round trip mismatch: {} != {}", original_sha256, restored_sha256);
        }

        Self {
            original_bytes: original.len() as u64,
            container_bytes: container_bytes as u64,
            original_sha256,
            restored_sha256,
            lossless,
        }
    }
}

/// Compress then decompress in memory and compare digests.
pub fn verify_bytes(input: &[u8]) -> Result<VerificationReport, CodecError> {
    let container = compress(input)?.to_bytes();
    let restored = decompress(&container)?;
    debug!("Round trip: {} -> {} -> {} bytes", input.len(), container.len(), restored.len());
    Ok(VerificationReport::build(input, container.len(), &restored))
}

pub fn verify_file(path: &Path) -> Result<VerificationReport> {
    let input = fs::read(path).with_context(|| format!("failed to read {:?}", path))?;
    Ok(verify_bytes(&input)?)
}

/// Check that `container` decodes back to the contents of `original`.
pub fn verify_container(original: &Path, container: &Path) -> Result<VerificationReport> {
    let input = fs::read(original).with_context(|| format!("failed to read {:?}", original))?;
    let data = fs::read(container).with_context(|| format!("failed to read {:?}", container))?;
    let restored = decompress(&data)?;
    Ok(VerificationReport::build(&input, data.len(), &restored))
}
