use serde::Serialize;

use crate::engine::codes::{code_to_string, CodeTable};
use crate::engine::tree::HuffmanTree;
use crate::protocol::ContainerHeader;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub payload_bits: u64,
    pub distinct_symbols: usize,
    pub max_code_len: usize,
}

impl CompressionStats {
    /// Output size relative to input size (1.0 when input is empty)
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            1.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Average payload bits spent per input byte
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.input_bytes as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompressionStats {
    pub container_bytes: u64,
    pub output_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    pub symbol: u8,
    pub frequency: u64,
    pub code: String,
}

/// What a container header says about its payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerSummary {
    pub version: u16,
    pub symbol_count: u64,
    pub distinct_symbols: usize,
    pub payload_bytes: u64,
    pub expected_payload_bits: Option<u64>,
    pub tree_depth: usize,
    pub codes: Vec<CodeEntry>,
}

impl ContainerSummary {
    pub fn from_header(header: &ContainerHeader, payload_bytes: u64) -> Self {
        let frequencies = &header.frequencies;
        let tree = HuffmanTree::build(frequencies);
        let codes = tree
            .as_ref()
            .map(CodeTable::from_tree)
            .unwrap_or_else(CodeTable::empty);

        let entries = codes
            .entries()
            .map(|(symbol, code)| CodeEntry {
                symbol,
                frequency: frequencies.get(symbol),
                code: code_to_string(code),
            })
            .collect();

        Self {
            version: header.version,
            symbol_count: header.symbol_count(),
            distinct_symbols: frequencies.distinct(),
            payload_bytes,
            expected_payload_bits: codes.encoded_bits(frequencies),
            tree_depth: tree.as_ref().map(HuffmanTree::depth).unwrap_or(0),
            codes: entries,
        }
    }
}

/// Printable form of a byte for console tables
pub fn display_symbol(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("0x{:02x}", symbol)
    }
}
