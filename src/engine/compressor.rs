use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::engine::bits::{pack, BitWriter};
use crate::engine::codes::{code_to_string, CodeTable};
use crate::engine::config::EngineConfig;
use crate::engine::error::CodecError;
use crate::engine::frequency::FrequencyTable;
use crate::engine::tree::HuffmanTree;
use crate::protocol::{Container, ContainerHeader};
use crate::report::{display_symbol, CompressionStats};
use crate::utils::io::read_chunk;

/// Build the code table for `frequencies`; empty when nothing was counted.
pub fn build_codes(frequencies: &FrequencyTable) -> CodeTable {
    match HuffmanTree::build(frequencies) {
        Some(tree) => CodeTable::from_tree(&tree),
        None => CodeTable::empty(),
    }
}

fn log_codes(frequencies: &FrequencyTable, codes: &CodeTable) {
    for (symbol, code) in codes.entries() {
        debug!(
            "{} (freq: {}): {}",
            display_symbol(symbol),
            frequencies.get(symbol),
            code_to_string(code)
        );
    }
}

fn max_code_len(codes: &CodeTable) -> usize {
    codes.entries().map(|(_, code)| code.len()).max().unwrap_or(0)
}

/// Compress an in-memory buffer.
pub fn compress(input: &[u8]) -> Result<Container, CodecError> {
    let frequencies = FrequencyTable::from_bytes(input);
    let codes = build_codes(&frequencies);
    log_codes(&frequencies, &codes);

    let payload = pack(
        input
            .iter()
            .flat_map(|&byte| codes.get(byte).unwrap_or_default().iter().copied()),
    );

    Ok(Container {
        header: ContainerHeader::new(frequencies),
        payload,
    })
}

/// Compress `source` into `sink` with two passes: one to count, one to encode.
///
/// The source is rewound between passes and must yield the same bytes both
/// times.
pub fn compress_stream<R: Read + Seek, W: Write>(
    source: &mut R,
    sink: &mut W,
    config: &EngineConfig,
) -> Result<CompressionStats, CodecError> {
    let buffer_size = config.effective_buffer_size();

    let frequencies = FrequencyTable::scan(source, buffer_size).map_err(CodecError::SourceRead)?;
    let input_bytes = frequencies.total().unwrap_or(u64::MAX);
    let codes = build_codes(&frequencies);

    debug!(
        "Counted {} bytes, {} distinct symbols",
        input_bytes,
        frequencies.distinct()
    );
    log_codes(&frequencies, &codes);

    source.seek(SeekFrom::Start(0)).map_err(CodecError::SourceRead)?;

    let header = ContainerHeader::new(frequencies);
    header.write_to(sink).map_err(CodecError::SinkWrite)?;

    let mut writer = BitWriter::new(&mut *sink);
    let mut recount = FrequencyTable::new();
    let mut buf = vec![0u8; buffer_size];

    loop {
        let n = read_chunk(source, &mut buf).map_err(CodecError::SourceRead)?;
        if n == 0 {
            break;
        }

        let chunk = &buf[..n];
        recount.record(chunk);
        for &byte in chunk {
            let code = codes.get(byte).ok_or(CodecError::SourceChanged)?;
            writer.write_code(code).map_err(CodecError::SinkWrite)?;
        }
    }

    let (_, payload_bits) = writer.finish().map_err(CodecError::SinkWrite)?;

    if recount != header.frequencies {
        warn!("Source changed between passes");
        return Err(CodecError::SourceChanged);
    }

    Ok(CompressionStats {
        input_bytes,
        output_bytes: ContainerHeader::SIZE as u64 + payload_bits.div_ceil(8),
        payload_bits,
        distinct_symbols: header.frequencies.distinct(),
        max_code_len: max_code_len(&codes),
    })
}

/// Refuse to truncate the input by opening it as the output.
pub(crate) fn ensure_distinct_paths(input: &Path, output: &Path) -> Result<(), CodecError> {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(input), fs::canonicalize(output)) {
        if a == b {
            return Err(CodecError::SinkWrite(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output {:?} is the input file", output),
            )));
        }
    }
    Ok(())
}

/// Compress the file at `input` into a new container file at `output`.
pub fn compress_file(
    input: &Path,
    output: &Path,
    config: &EngineConfig,
) -> Result<CompressionStats, CodecError> {
    info!("Compressing {:?} -> {:?}", input, output);

    let source = File::open(input).map_err(CodecError::SourceRead)?;
    ensure_distinct_paths(input, output)?;
    let mut source = BufReader::with_capacity(config.effective_buffer_size(), source);

    let result = {
        let file = File::create(output).map_err(CodecError::SinkWrite)?;
        let mut sink = BufWriter::new(file);
        compress_stream(&mut source, &mut sink, config)
    };

    match result {
        Ok(stats) => {
            info!(
                "Compressed {} bytes into {} bytes ({:.1}%)",
                stats.input_bytes,
                stats.output_bytes,
                stats.ratio() * 100.0
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
