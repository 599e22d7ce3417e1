//! LZ4 block compression of packed trees.
//!
//! The stored stream is a raw LZ4 block with no size prefix, so the
//! decompressed size is not known up front. Decompression guesses the
//! output size from the ciphertext length and retries once with a much
//! larger buffer; both guesses are clamped to a configurable cap.

use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size, DecompressError};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::cipher::BLOCK_LEN;
use crate::crypto::secure::SecretBytes;
use crate::errors::{PassNoteError, Result};

/// Output-size guesses, as multiples of the ciphertext length.
const GROWTH_FACTORS: [usize; 2] = [8, 255];

/// Compress `input` into a raw LZ4 block.
///
/// The returned buffer has one spare cipher block of capacity so that
/// zero padding can be appended without reallocating.
pub fn compress(input: &[u8]) -> Result<SecretBytes> {
    let bound = get_maximum_output_size(input.len());
    let mut out = zeroed_buffer(bound + BLOCK_LEN)?;

    let len = compress_into(input, &mut out[..bound])
        .map_err(|e| PassNoteError::CompressionFailed(e.to_string()))?;
    out.truncate(len);

    debug!(input = input.len(), output = len, "compressed packed tree");
    Ok(out)
}

/// Decompress a raw LZ4 block that came out of `ciphertext_len` bytes of
/// ciphertext, never producing more than `max_output` bytes.
pub fn decompress(compressed: &[u8], ciphertext_len: usize, max_output: usize) -> Result<SecretBytes> {
    for (attempt, factor) in GROWTH_FACTORS.iter().enumerate() {
        let wanted = ciphertext_len.saturating_mul(*factor);
        let size = wanted.min(max_output);
        let mut out = zeroed_buffer(size)?;

        match decompress_into(compressed, &mut out) {
            Ok(len) => {
                out.truncate(len);
                debug!(attempt, output = len, "decompressed packed tree");
                return Ok(out);
            }
            Err(DecompressError::OutputTooSmall { .. }) if size < wanted => {
                return Err(PassNoteError::AllocationFailed(format!(
                    "decompressed data exceeds the {max_output}-byte limit"
                )));
            }
            Err(DecompressError::OutputTooSmall { .. }) => {
                debug!(attempt, size, "decompression buffer too small, retrying");
            }
            Err(e) => return Err(PassNoteError::DecompressionFailed(e.to_string())),
        }
    }

    Err(PassNoteError::DecompressionFailed(
        "decompressed data does not fit the largest buffer".into(),
    ))
}

fn zeroed_buffer(size: usize) -> Result<SecretBytes> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|e| PassNoteError::AllocationFailed(format!("{size} bytes: {e}")))?;
    buf.resize(size, 0);
    Ok(Zeroizing::new(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: usize = 1 << 20;

    #[test]
    fn roundtrip() {
        let input = b"PASSNOTE h-Root\0 l-Mail\0 repeated repeated repeated repeated".repeat(4);
        let compressed = compress(&input).unwrap();
        assert!(compressed.capacity() >= compressed.len() + BLOCK_LEN);

        let out = decompress(&compressed, compressed.len(), MIB).unwrap();
        assert_eq!(&out[..], &input[..]);
    }

    #[test]
    fn retries_with_larger_buffer() {
        // Highly compressible: more than 8x smaller.
        let input = vec![b'a'; 4096];
        let compressed = compress(&input).unwrap();
        assert!(compressed.len() * 8 < input.len());

        let out = decompress(&compressed, compressed.len(), MIB).unwrap();
        assert_eq!(out.len(), input.len());
    }

    #[test]
    fn cap_is_enforced() {
        let input = vec![b'a'; 64 * 1024];
        let compressed = compress(&input).unwrap();
        let err = decompress(&compressed, compressed.len(), 1024).unwrap_err();
        assert!(matches!(err, PassNoteError::AllocationFailed(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let garbage = [0xffu8; 32];
        assert!(decompress(&garbage, 32, MIB).is_err());
    }
}
