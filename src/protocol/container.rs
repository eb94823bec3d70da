use std::io::{self, Write};

use tracing::{error, trace};

use crate::engine::error::CodecError;
use crate::engine::frequency::FrequencyTable;
use crate::protocol::constants::{CONTAINER_MAGIC, FORMAT_VERSION, FREQUENCY_ENTRY_SIZE, HEADER_SIZE};
use crate::protocol::error::ContainerError;
use crate::utils::limits::ALPHABET_SIZE;

/// Fixed-size container header (2054 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u16,
    pub frequencies: FrequencyTable,
}

impl ContainerHeader {
    pub const SIZE: usize = HEADER_SIZE;

    pub fn new(frequencies: FrequencyTable) -> Self {
        Self {
            version: FORMAT_VERSION,
            frequencies,
        }
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ContainerError> {
        if buf.len() < Self::SIZE {
            error!("Container header too short: {} bytes, expected {}", buf.len(), Self::SIZE);
            return Err(ContainerError::TruncatedHeader(buf.len()));
        }

        if buf[0..4] != CONTAINER_MAGIC {
            error!("Invalid magic bytes: {:?}, expected {:?}", &buf[0..4], CONTAINER_MAGIC);
            return Err(ContainerError::InvalidMagic);
        }

        let version = u16::from_be_bytes([buf[4], buf[5]]);
        if version != FORMAT_VERSION {
            error!("Unsupported version: {}, expected {}", version, FORMAT_VERSION);
            return Err(ContainerError::UnsupportedVersion(version));
        }

        let mut counts = [0u64; ALPHABET_SIZE];
        for (symbol, entry) in buf[6..Self::SIZE]
            .chunks_exact(FREQUENCY_ENTRY_SIZE)
            .enumerate()
        {
            let mut raw = [0u8; FREQUENCY_ENTRY_SIZE];
            raw.copy_from_slice(entry);
            counts[symbol] = u64::from_be_bytes(raw);
        }

        let frequencies = FrequencyTable::from_counts(counts);
        if frequencies.total().is_none() {
            error!("Frequency table total overflows u64");
            return Err(ContainerError::FrequencyOverflow);
        }

        trace!("Decoded header: version={}, distinct={}", version, frequencies.distinct());

        Ok(Self { version, frequencies })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        buf.extend_from_slice(&CONTAINER_MAGIC);
        buf.extend_from_slice(&self.version.to_be_bytes());
        for &count in self.frequencies.as_array() {
            buf.extend_from_slice(&count.to_be_bytes());
        }
        buf
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.encode())
    }

    /// Number of symbols the payload encodes
    pub fn symbol_count(&self) -> u64 {
        self.frequencies.total().unwrap_or(u64::MAX)
    }
}

/// Complete in-memory container: header followed by the packed bitstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub header: ContainerHeader,
    pub payload: Vec<u8>,
}

impl Container {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header.encode();
        out.extend_from_slice(&self.payload);
        out
    }

    /// Split raw bytes into header and payload. Payload consistency is
    /// checked when decoding.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ContainerError> {
        let header = ContainerHeader::decode(data)?;
        Ok(Self {
            header,
            payload: data[ContainerHeader::SIZE..].to_vec(),
        })
    }

    pub fn encoded_len(&self) -> usize {
        ContainerHeader::SIZE + self.payload.len()
    }

    /// Reconstruct the original bytes
    pub fn decode(&self) -> Result<Vec<u8>, CodecError> {
        crate::engine::decompressor::decode_payload(&self.header.frequencies, &self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_magic_version_then_counts() {
        let header = ContainerHeader::new(FrequencyTable::from_bytes(b"AAB"));
        let buf = header.encode();

        assert_eq!(buf.len(), 2054);
        assert_eq!(&buf[0..4], b"HUFZ");
        assert_eq!(&buf[4..6], &[0, 1]);
        let a = 6 + b'A' as usize * 8;
        assert_eq!(u64::from_be_bytes(buf[a..a + 8].try_into().unwrap()), 2);
        let b = 6 + b'B' as usize * 8;
        assert_eq!(u64::from_be_bytes(buf[b..b + 8].try_into().unwrap()), 1);
    }

    #[test]
    fn header_decodes_what_it_encodes() {
        let header = ContainerHeader::new(FrequencyTable::from_bytes(b"hello world"));
        assert_eq!(ContainerHeader::decode(&header.encode()).unwrap(), header);
    }

    #[test]
    fn short_header_is_rejected() {
        let buf = ContainerHeader::new(FrequencyTable::new()).encode();
        assert_eq!(
            ContainerHeader::decode(&buf[..100]),
            Err(ContainerError::TruncatedHeader(100))
        );
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut buf = ContainerHeader::new(FrequencyTable::new()).encode();
        buf[0] = b'X';
        assert_eq!(ContainerHeader::decode(&buf), Err(ContainerError::InvalidMagic));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut buf = ContainerHeader::new(FrequencyTable::new()).encode();
        buf[5] = 9;
        assert_eq!(ContainerHeader::decode(&buf), Err(ContainerError::UnsupportedVersion(9)));
    }

    #[test]
    fn overflowing_counts_are_rejected() {
        let mut buf = ContainerHeader::new(FrequencyTable::new()).encode();
        buf[6..14].copy_from_slice(&u64::MAX.to_be_bytes());
        buf[14..22].copy_from_slice(&1u64.to_be_bytes());
        assert_eq!(ContainerHeader::decode(&buf), Err(ContainerError::FrequencyOverflow));
    }

    #[test]
    fn container_splits_header_and_payload() {
        let container = Container {
            header: ContainerHeader::new(FrequencyTable::from_bytes(b"ab")),
            payload: vec![0x40],
        };
        let bytes = container.to_bytes();
        assert_eq!(bytes.len(), container.encoded_len());
        assert_eq!(Container::from_bytes(&bytes).unwrap(), container);
    }

    #[test]
    fn container_decodes_its_payload() {
        let container = crate::engine::compress(b"go go gophers").unwrap();
        assert_eq!(container.decode().unwrap(), b"go go gophers");
    }
}
