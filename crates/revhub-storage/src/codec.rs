//! Revision payload codec.
//!
//! Content is stored as a zstd frame. [`compress`] uses the highest level
//! the linked library supports; [`decompress`] accepts any valid frame.

use std::io::Read;

use revhub_core::error::{AppError, ErrorKind};
use revhub_core::result::AppResult;

/// Largest block a raw zstd block may carry.
const MAX_RAW_BLOCK: usize = 128 * 1024;

/// Compress `data` at the maximum zstd level.
///
/// If the encoder refuses the input, the bytes are wrapped in an
/// uncompressed frame instead, which [`decompress`] reads the same way.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let level = *zstd::compression_level_range().end();
    match zstd::bulk::compress(data, level) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::warn!(error = %err, level, "zstd encoding failed, storing uncompressed frame");
            stored_frame(data)
        }
    }
}

/// Inverse of [`compress`].
pub fn decompress(data: &[u8]) -> AppResult<Vec<u8>> {
    let mut decoder = zstd::stream::read::Decoder::new(data).map_err(|e| {
        AppError::with_source(ErrorKind::CorruptPayload, "Failed to open payload decoder", e)
    })?;
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).map_err(|e| {
        AppError::with_source(ErrorKind::CorruptPayload, "Stored payload is not a valid zstd frame", e)
    })?;
    Ok(decoded)
}

/// Build a single-segment zstd frame made of raw blocks.
fn stored_frame(data: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(data.len() + 16 + 3 * (data.len() / MAX_RAW_BLOCK + 1));
    frame.extend_from_slice(&0xFD2F_B528u32.to_le_bytes());
    // Descriptor: 8-byte content size, single segment, no checksum or dictionary.
    frame.push(0b1110_0000);
    frame.extend_from_slice(&(data.len() as u64).to_le_bytes());

    let mut chunks = data.chunks(MAX_RAW_BLOCK).peekable();
    if chunks.peek().is_none() {
        frame.extend_from_slice(&block_header(0, true));
    }
    while let Some(chunk) = chunks.next() {
        let last = chunks.peek().is_none();
        frame.extend_from_slice(&block_header(chunk.len(), last));
        frame.extend_from_slice(chunk);
    }
    frame
}

/// Three-byte little-endian header of a raw block.
fn block_header(size: usize, last: bool) -> [u8; 3] {
    let value = ((size as u32) << 3) | u32::from(last);
    let bytes = value.to_le_bytes();
    [bytes[0], bytes[1], bytes[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let text = b"import React from 'react';\n".repeat(200);
        let encoded = compress(&text);
        assert!(encoded.len() < text.len());
        assert_eq!(decompress(&encoded).unwrap(), text);
    }

    #[test]
    fn test_round_trip_empty() {
        let encoded = compress(&[]);
        assert!(!encoded.is_empty());
        assert!(decompress(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_binary() {
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        assert_eq!(decompress(&compress(&data)).unwrap(), data);
    }

    #[test]
    fn test_stored_frame_is_readable() {
        assert!(decompress(&stored_frame(&[])).unwrap().is_empty());

        let data: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(decompress(&stored_frame(&data)).unwrap(), data);
    }

    #[test]
    fn test_garbage_is_corrupt_payload() {
        let err = decompress(b"definitely not zstd").unwrap_err();
        assert_eq!(err.kind, ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_truncated_frame_is_corrupt_payload() {
        let encoded = compress(&b"hello world, hello world".repeat(50));
        let err = decompress(&encoded[..encoded.len() / 2]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CorruptPayload);
    }
}
