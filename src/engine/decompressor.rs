use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::engine::codes::CodeTable;
use crate::engine::config::EngineConfig;
use crate::engine::error::CodecError;
use crate::engine::frequency::FrequencyTable;
use crate::engine::tree::{HuffmanTree, NodeId};
use crate::protocol::{ContainerError, ContainerHeader};
use crate::report::DecompressionStats;
use crate::utils::io::read_chunk;

/// Walks the tree one bit at a time and emits a byte at every leaf.
#[derive(Debug)]
pub struct SymbolDecoder<'t> {
    tree: &'t HuffmanTree,
    cursor: NodeId,
    remaining: u64,
    bit_offset: u64,
}

impl<'t> SymbolDecoder<'t> {
    pub fn new(tree: &'t HuffmanTree, symbol_count: u64) -> Self {
        Self {
            tree,
            cursor: tree.root(),
            remaining: symbol_count,
            bit_offset: 0,
        }
    }

    /// Symbols still to be decoded
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Bits consumed so far
    pub fn bit_offset(&self) -> u64 {
        self.bit_offset
    }

    /// True when a walk has started but not reached a leaf yet
    pub fn mid_symbol(&self) -> bool {
        self.cursor != self.tree.root()
    }

    pub fn push_bit(&mut self, bit: bool) -> Result<Option<u8>, CodecError> {
        let offset = self.bit_offset;
        self.bit_offset += 1;

        if self.remaining == 0 {
            return Err(CodecError::DecodeTraversal { bit_offset: offset });
        }

        // A lone leaf has no edges: every bit stands for its symbol.
        if self.tree.is_single_leaf() {
            self.remaining -= 1;
            return Ok(self.tree.symbol(self.cursor));
        }

        self.cursor = self
            .tree
            .child(self.cursor, bit)
            .ok_or(CodecError::DecodeTraversal { bit_offset: offset })?;

        match self.tree.symbol(self.cursor) {
            Some(symbol) => {
                self.cursor = self.tree.root();
                self.remaining -= 1;
                Ok(Some(symbol))
            }
            None => Ok(None),
        }
    }
}

/// Decodes a payload fed in arbitrary chunks, checking it against the exact
/// length implied by the frequency table.
#[derive(Debug)]
pub struct PayloadDecoder<'t> {
    decoder: Option<SymbolDecoder<'t>>,
    payload_bits: u64,
    expected_bytes: u64,
    bytes_seen: u64,
}

impl<'t> PayloadDecoder<'t> {
    pub fn new(
        frequencies: &FrequencyTable,
        tree: Option<&'t HuffmanTree>,
    ) -> Result<Self, CodecError> {
        let symbol_count = frequencies.total().ok_or(ContainerError::FrequencyOverflow)?;

        let payload_bits = match tree {
            Some(tree) => CodeTable::from_tree(tree)
                .encoded_bits(frequencies)
                .ok_or(ContainerError::FrequencyOverflow)?,
            None => 0,
        };

        Ok(Self {
            decoder: tree.map(|tree| SymbolDecoder::new(tree, symbol_count)),
            payload_bits,
            expected_bytes: payload_bits.div_ceil(8),
            bytes_seen: 0,
        })
    }

    pub fn expected_bytes(&self) -> u64 {
        self.expected_bytes
    }

    pub fn payload_bits(&self) -> u64 {
        self.payload_bits
    }

    /// Decode `chunk`, appending recovered bytes to `out`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
        for &byte in chunk {
            if self.bytes_seen >= self.expected_bytes {
                return Err(ContainerError::TrailingBytes {
                    expected: self.expected_bytes,
                }
                .into());
            }

            let first_bit = self.bytes_seen * 8;
            for bit_pos in 0..8u64 {
                let bit = (byte >> (7 - bit_pos)) & 1 == 1;

                if first_bit + bit_pos >= self.payload_bits {
                    if bit {
                        return Err(ContainerError::NonZeroPadding.into());
                    }
                    continue;
                }

                if let Some(decoder) = self.decoder.as_mut() {
                    if let Some(symbol) = decoder.push_bit(bit)? {
                        out.push(symbol);
                    }
                }
            }

            self.bytes_seen += 1;
        }

        Ok(())
    }

    /// Check that the payload ended exactly where the last symbol did.
    pub fn finish(self) -> Result<(), CodecError> {
        if self.bytes_seen < self.expected_bytes {
            return Err(ContainerError::TruncatedPayload {
                expected: self.expected_bytes,
                actual: self.bytes_seen,
            }
            .into());
        }

        if let Some(decoder) = &self.decoder {
            // Full-length payload that walked to the wrong leaves
            if !decoder.is_done() || decoder.mid_symbol() {
                return Err(CodecError::DecodeTraversal {
                    bit_offset: decoder.bit_offset(),
                });
            }
        }

        Ok(())
    }
}

/// Decode a complete in-memory payload.
pub fn decode_payload(frequencies: &FrequencyTable, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let tree = HuffmanTree::build(frequencies);
    let mut decoder = PayloadDecoder::new(frequencies, tree.as_ref())?;

    let capacity = frequencies.total().unwrap_or(0).min(payload.len() as u64 * 8);
    let mut out = Vec::with_capacity(capacity as usize);
    decoder.feed(payload, &mut out)?;
    decoder.finish()?;

    Ok(out)
}

/// Decode a serialized container held in memory.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let header = ContainerHeader::decode(data)?;
    decode_payload(&header.frequencies, &data[ContainerHeader::SIZE..])
}

/// Read the fixed-size header from the front of `source`.
pub fn read_header<R: Read>(source: &mut R) -> Result<ContainerHeader, CodecError> {
    let mut buf = vec![0u8; ContainerHeader::SIZE];
    let mut filled = 0;

    while filled < buf.len() {
        let n = read_chunk(source, &mut buf[filled..]).map_err(CodecError::SourceRead)?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    Ok(ContainerHeader::decode(&buf[..filled])?)
}

/// Decode a container from `source` into `sink`, one chunk at a time.
pub fn decompress_stream<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    config: &EngineConfig,
) -> Result<DecompressionStats, CodecError> {
    let header = read_header(source)?;
    let tree = HuffmanTree::build(&header.frequencies);
    let mut decoder = PayloadDecoder::new(&header.frequencies, tree.as_ref())?;

    debug!(
        "Container v{}: {} symbols, {} distinct, {} payload bytes expected",
        header.version,
        header.symbol_count(),
        header.frequencies.distinct(),
        decoder.expected_bytes()
    );

    let mut buf = vec![0u8; config.effective_buffer_size()];
    let mut out = Vec::with_capacity(buf.len());
    let mut payload_bytes = 0u64;
    let mut output_bytes = 0u64;

    loop {
        let n = read_chunk(source, &mut buf).map_err(CodecError::SourceRead)?;
        if n == 0 {
            break;
        }
        payload_bytes += n as u64;

        decoder.feed(&buf[..n], &mut out)?;
        sink.write_all(&out).map_err(CodecError::SinkWrite)?;
        output_bytes += out.len() as u64;
        trace!("Decoded chunk: {} payload bytes -> {} bytes", n, out.len());
        out.clear();
    }

    decoder.finish()?;
    sink.flush().map_err(CodecError::SinkWrite)?;

    Ok(DecompressionStats {
        container_bytes: ContainerHeader::SIZE as u64 + payload_bytes,
        output_bytes,
    })
}

/// Decompress the container at `input` into a new file at `output`.
pub fn decompress_file(
    input: &Path,
    output: &Path,
    config: &EngineConfig,
) -> Result<DecompressionStats, CodecError> {
    info!("Decompressing {:?} -> {:?}", input, output);

    let source = File::open(input).map_err(CodecError::SourceRead)?;
    crate::engine::compressor::ensure_distinct_paths(input, output)?;
    let mut source = BufReader::with_capacity(config.effective_buffer_size(), source);

    let result = {
        let file = File::create(output).map_err(CodecError::SinkWrite)?;
        let mut sink = BufWriter::new(file);
        decompress_stream(&mut source, &mut sink, config)
    };

    match result {
        Ok(stats) => {
            info!(
                "Decompressed {} bytes into {} bytes",
                stats.container_bytes, stats.output_bytes
            );
            Ok(stats)
        }
        Err(e) => {
            if !config.keep_partial_output {
                if let Err(remove_err) = fs::remove_file(output) {
                    warn!("Failed to remove partial output {:?}: {}", output, remove_err);
                }
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bits::pack;
    use crate::protocol::Container;
    use std::io::Cursor;

    fn container_for(frequencies: FrequencyTable, payload: Vec<u8>) -> Vec<u8> {
        Container {
            header: ContainerHeader::new(frequencies),
            payload,
        }
        .to_bytes()
    }

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn decodes_hand_packed_payload() {
        // A=0 C=10 B=11: AAABBC -> 0 0 0 11 11 10
        let payload = pack(bits("000111110"));
        let data = container_for(FrequencyTable::from_bytes(b"AAABBC"), payload);
        assert_eq!(decompress(&data).unwrap(), b"AAABBC");
    }

    #[test]
    fn padding_that_would_decode_as_symbol_is_ignored() {
        // "A" alone would be one 0 bit, and the seven zero pad bits would
        // otherwise walk to A seven more times.
        let freqs = FrequencyTable::from_bytes(b"AB");
        let tree = HuffmanTree::build(&freqs).unwrap();
        let codes = CodeTable::from_tree(&tree);
        assert_eq!(codes.get(b'A'), Some(&[false][..]));

        let payload = pack(bits("01"));
        let data = container_for(freqs, payload);
        assert_eq!(decompress(&data).unwrap(), b"AB");
    }

    #[test]
    fn single_symbol_ignores_bit_values() {
        let freqs = FrequencyTable::from_bytes(b"qqqqqqqqqq");
        let data = container_for(freqs, vec![0x00, 0x00]);
        assert_eq!(decompress(&data).unwrap(), b"qqqqqqqqqq");
    }

    #[test]
    fn empty_container_decodes_to_nothing() {
        let data = container_for(FrequencyTable::new(), Vec::new());
        assert_eq!(decompress(&data).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn empty_table_with_payload_is_malformed() {
        let data = container_for(FrequencyTable::new(), vec![0]);
        assert!(matches!(
            decompress(&data),
            Err(CodecError::MalformedContainer(ContainerError::TrailingBytes { expected: 0 }))
        ));
    }

    #[test]
    fn missing_payload_byte_is_truncation() {
        let data = container_for(FrequencyTable::from_bytes(b"AAABBCAAABBC"), vec![0b0001_1111]);
        assert!(matches!(
            decompress(&data),
            Err(CodecError::MalformedContainer(ContainerError::TruncatedPayload { expected: 3, actual: 1 }))
        ));
    }

    #[test]
    fn extra_payload_byte_is_rejected() {
        let mut payload = pack(bits("000111110"));
        payload.push(0);
        let data = container_for(FrequencyTable::from_bytes(b"AAABBC"), payload);
        assert!(matches!(
            decompress(&data),
            Err(CodecError::MalformedContainer(ContainerError::TrailingBytes { expected: 2 }))
        ));
    }

    #[test]
    fn nonzero_padding_is_rejected() {
        let data = container_for(FrequencyTable::from_bytes(b"AAABBC"), vec![0b0001_1111, 0b0100_0000]);
        assert!(matches!(
            decompress(&data),
            Err(CodecError::MalformedContainer(ContainerError::NonZeroPadding))
        ));
    }

    #[test]
    fn corrupt_payload_ending_mid_walk_is_a_traversal_error() {
        // B B B B then a dangling 1: right length, too few symbols
        let data = container_for(FrequencyTable::from_bytes(b"AAABBC"), pack(bits("111111111")));
        assert!(matches!(
            decompress(&data),
            Err(CodecError::DecodeTraversal { bit_offset: 9 })
        ));
    }

    #[test]
    fn corrupt_payload_reaching_count_early_is_a_traversal_error() {
        // Six zeros decode six A's, leaving payload bits unused
        let data = container_for(FrequencyTable::from_bytes(b"AAABBC"), pack(bits("000000000")));
        assert!(matches!(
            decompress(&data),
            Err(CodecError::DecodeTraversal { bit_offset: 6 })
        ));
    }

    #[test]
    fn truncated_header_is_malformed() {
        assert!(matches!(
            decompress(b"HUFZ"),
            Err(CodecError::MalformedContainer(ContainerError::TruncatedHeader(4)))
        ));
    }

    #[test]
    fn decoder_refuses_bits_after_last_symbol() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"ab")).unwrap();
        let mut decoder = SymbolDecoder::new(&tree, 1);
        assert_eq!(decoder.push_bit(false).unwrap(), Some(b'a'));
        assert!(decoder.is_done());
        assert!(matches!(
            decoder.push_bit(false),
            Err(CodecError::DecodeTraversal { bit_offset: 1 })
        ));
    }

    #[test]
    fn stream_decoding_reports_sizes() {
        let data = container_for(FrequencyTable::from_bytes(b"AAABBC"), pack(bits("000111110")));
        let mut sink = Vec::new();
        let config = EngineConfig { buffer_size: 1, ..Default::default() };
        let stats = decompress_stream(&mut Cursor::new(&data), &mut sink, &config).unwrap();

        assert_eq!(sink, b"AAABBC");
        assert_eq!(stats.output_bytes, 6);
        assert_eq!(stats.container_bytes, data.len() as u64);
    }
}
