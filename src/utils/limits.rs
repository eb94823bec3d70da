/// Default chunk size for buffered source reads
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024; // 64KB

/// Smallest accepted chunk size
pub const MIN_BUFFER_SIZE: usize = 512;

/// Largest accepted chunk size
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// Number of distinct byte symbols
pub const ALPHABET_SIZE: usize = 256;
