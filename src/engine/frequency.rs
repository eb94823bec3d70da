use std::io::{self, Read};

use crate::utils::io::read_chunk;
use crate::utils::limits::ALPHABET_SIZE;

/// Occurrence count for every byte value, indexed by the byte itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    pub fn from_counts(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.record(data);
        table
    }

    /// Count every byte of `reader` in one buffered pass, consuming it.
    pub fn scan<R: Read>(reader: &mut R, buffer_size: usize) -> io::Result<Self> {
        let mut table = Self::new();
        let mut buf = vec![0u8; buffer_size.max(1)];

        loop {
            let n = read_chunk(reader, &mut buf)?;
            if n == 0 {
                break;
            }
            table.record(&buf[..n]);
        }

        Ok(table)
    }

    pub fn record(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts, `None` if it does not fit in a u64.
    pub fn total(&self) -> Option<u64> {
        self.counts
            .iter()
            .try_fold(0u64, |acc, &count| acc.checked_add(count))
    }

    /// Number of byte values that occur at least once
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Nonzero `(symbol, count)` pairs in ascending symbol order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    pub fn as_array(&self) -> &[u64; ALPHABET_SIZE] {
        &self.counts
    }
}
