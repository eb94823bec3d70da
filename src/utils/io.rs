use std::io::{self, Read};

/// Read up to `buf.len()` bytes, retrying on interruption. Returns 0 at end of input.
pub fn read_chunk<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
