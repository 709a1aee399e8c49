//! # rust_huffman
//!
//! Lossless byte-level Huffman compression. Each file carries its own
//! frequency table, so nothing but the compressed bytes is needed to get the
//! original back.
//!
//! ## Quick Start
//!
//! ```rust
//! let original = b"the quick brown fox jumps over the lazy dog".to_vec();
//!
//! let compressed = rust_huffman::compress(&original)?;
//! let restored = rust_huffman::decompress(&compressed)?;
//! assert_eq!(restored, original);
//! # Ok::<(), rust_huffman::CodecError>(())
//! ```
//!
//! ## File format
//!
//! All integers are big-endian.
//!
//! ```text
//! table_size : i32
//! table_size x { symbol : u8, frequency : u32 }   ascending symbol order
//! codes of every input byte, MSB first, zero padded to a byte boundary
//! ```
//!
//! The decoder stops after `sum(frequency)` symbols, so the padding is never
//! mistaken for data.

pub mod bit_io;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_io::{BitReader, BitWriter};
pub use error::{CodecError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{CodecConfig, HuffmanCodec};
pub use hufftree::{Code, CodeMap, HuffmanTree};
pub use metadata::CompressionStats;

/// Compresses `input` with the default configuration.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().compress(input)
}

/// Inverse of [`compress`].
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().decompress(input)
}
