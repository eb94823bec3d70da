use serde::{Deserialize, Serialize};

use crate::utils::limits::{DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk size for source reads
    pub buffer_size: usize,
    /// Decode the container again after compressing and compare digests
    pub verify_after_compress: bool,
    /// Leave a half-written output file in place when an operation fails
    pub keep_partial_output: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            verify_after_compress: false,
            keep_partial_output: false,
        }
    }
}

impl EngineConfig {
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)
    }
}
