use std::io::{self, Write};

/// Packs bits MSB-first into bytes written to `inner`.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    current_byte: u8,
    bit_count: u8,
    bits_written: u64,
    pending: Vec<u8>,
}

impl<W: Write> BitWriter<W> {
    const FLUSH_THRESHOLD: usize = 8 * 1024;

    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current_byte: 0,
            bit_count: 0,
            bits_written: 0,
            pending: Vec::with_capacity(Self::FLUSH_THRESHOLD),
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.current_byte |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;
        self.bits_written += 1;

        if self.bit_count == 8 {
            self.pending.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;

            if self.pending.len() >= Self::FLUSH_THRESHOLD {
                self.inner.write_all(&self.pending)?;
                self.pending.clear();
            }
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &[bool]) -> io::Result<()> {
        for &bit in code {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bits accepted so far, padding excluded
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Zero-pad the last partial byte, flush, and hand back the sink with the
    /// number of real bits written.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        if self.bit_count > 0 {
            self.pending.push(self.current_byte);
        }
        self.inner.write_all(&self.pending)?;
        self.inner.flush()?;
        Ok((self.inner, self.bits_written))
    }
}

/// Pack a bit sequence into bytes, zero-padding the final byte.
pub fn pack<I: IntoIterator<Item = bool>>(bits: I) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut current_byte = 0u8;
    let mut bit_count = 0;

    for bit in bits {
        if bit {
            current_byte |= 1 << (7 - bit_count);
        }
        bit_count += 1;

        if bit_count == 8 {
            bytes.push(current_byte);
            current_byte = 0;
            bit_count = 0;
        }
    }

    if bit_count > 0 {
        bytes.push(current_byte);
    }
    bytes
}

/// Yields the bits of a byte slice, MSB-first.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bits consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.bytes.len() as u64 * 8 - self.position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let byte = *self.bytes.get((self.position / 8) as usize)?;
        let bit_pos = self.position % 8;
        self.position += 1;
        Some((byte >> (7 - bit_pos)) & 1 == 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

/// Expand packed bytes into their bits, padding included.
pub fn unpack(bytes: &[u8]) -> Vec<bool> {
    BitReader::new(bytes).collect()
}
