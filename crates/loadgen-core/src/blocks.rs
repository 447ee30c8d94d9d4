//! Fixed-content payload generation.

use std::io::Write;

/// Filler byte used for every generated payload.
pub const FILLER: u8 = b'a';

/// Shared read-only 1KB block. Never mutated, safe to hand out concurrently.
pub static KILOBYTE_BLOCK: [u8; 1024] = [FILLER; 1024];

/// Writes `count` copies of the shared block into `out` and returns the
/// total bytes written (`count * 1024`). No internal buffering beyond each
/// 1KB write; a rejected write aborts and propagates the I/O error.
pub fn stream_blocks<W: Write>(out: &mut W, count: usize) -> std::io::Result<u64> {
    let mut written = 0u64;
    for _ in 0..count {
        out.write_all(&KILOBYTE_BLOCK)?;
        written += KILOBYTE_BLOCK.len() as u64;
    }
    Ok(written)
}

/// Lazily yields the shared block `count` times, for chunked response bodies.
pub fn block_stream(count: usize) -> impl Iterator<Item = &'static [u8; 1024]> {
    std::iter::repeat(&KILOBYTE_BLOCK).take(count)
}

/// A string of exactly `size` filler characters; `size == 0` gives "".
pub fn string_of_size(size: usize) -> String {
    std::iter::repeat(FILLER as char).take(size).collect()
}
