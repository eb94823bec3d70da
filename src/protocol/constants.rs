//! Container format constants

/// Container magic bytes: "HUFZ"
pub const CONTAINER_MAGIC: [u8; 4] = *b"HUFZ";

/// Current container format version
pub const FORMAT_VERSION: u16 = 1;

/// Width of one frequency entry on disk (u64, big-endian)
pub const FREQUENCY_ENTRY_SIZE: usize = 8;

/// Fixed header size: magic + version + 256 frequency entries
pub const HEADER_SIZE: usize = 4 + 2 + crate::utils::limits::ALPHABET_SIZE * FREQUENCY_ENTRY_SIZE;
