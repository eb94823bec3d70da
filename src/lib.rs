//! Lossless byte-level Huffman compression.
//!
//! A container holds the 256-entry frequency table of the input followed by
//! the packed code bits. Both sides rebuild the same tree from that table, and
//! the table total tells the decoder exactly how many symbols to emit.

pub mod cli;
pub mod config;
pub mod engine;
pub mod proof;
pub mod protocol;
pub mod report;
pub mod utils;

pub use engine::config::EngineConfig;
pub use engine::error::CodecError;
pub use engine::frequency::FrequencyTable;
pub use engine::{compress, compress_file, compress_stream, decompress, decompress_file, decompress_stream};
pub use protocol::{Container, ContainerError, ContainerHeader};
pub use report::{CompressionStats, DecompressionStats};
