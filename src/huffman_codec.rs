use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use log::{debug, trace};

use crate::bit_io::{BitReader, BitWriter};
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::metadata::CompressionStats;

// Upper bound on what a header alone can make us preallocate.
const MAX_PREALLOC: u64 = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Decode every freshly compressed buffer and compare it with the input.
    pub verify: bool,
    /// Buffer size for the file helpers.
    pub io_buffer_capacity: usize,
}

impl CodecConfig {
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_io_buffer_capacity(mut self, capacity: usize) -> Self {
        self.io_buffer_capacity = capacity.max(1);
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            verify: false,
            io_buffer_capacity: 64 * 1024,
        }
    }
}

/// Compresses and decompresses whole buffers.
///
/// The codec only carries its configuration. Every call builds its own table,
/// tree and code map, so one instance can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        HuffmanCodec { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.compress_with_stats(data).map(|(encoded, _)| encoded)
    }

    pub fn compress_with_stats(&self, data: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
        let mut encoded = Vec::new();
        let stats = self.encode_into(data, &mut encoded)?;

        if self.config.verify && self.decompress(&encoded)? != data {
            return Err(CodecError::VerificationFailed);
        }

        debug!("compressed {}", stats);
        Ok((encoded, stats))
    }

    fn encode_into<W: Write>(&self, data: &[u8], mut writer: W) -> Result<CompressionStats> {
        let table = FrequencyTable::compute(data)?;
        table.serialize(&mut writer)?;
        let header_len = table.serialized_len() as u64;

        let tree = match HuffmanTree::build(&table) {
            Some(tree) => tree,
            None => {
                writer.flush()?;
                return Ok(CompressionStats::new(0, header_len, 0, 0));
            }
        };
        trace!("huffman tree:\n{}", tree);

        let codes = tree.derive_codes();
        for (byte, code) in &codes {
            trace!("{:#04x} -> {}", byte, code);
        }

        let mut bits = BitWriter::new(writer);
        for byte in data {
            let code = codes.get(byte).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Byte {} not in encode table", byte),
                )
            })?;
            bits.write_code(code)?;
        }
        let body_bits = bits.bits_written();
        bits.finish()?;

        Ok(CompressionStats::new(
            data.len() as u64,
            header_len,
            body_bits,
            table.len(),
        ))
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode_from(Cursor::new(data))
    }

    /// Reads the header, then decodes exactly as many symbols as it counts.
    /// Anything after the final padded byte is left unread.
    fn decode_from<R: Read>(&self, mut reader: R) -> Result<Vec<u8>> {
        let table = FrequencyTable::deserialize(&mut reader)?;
        let tree = match HuffmanTree::build(&table) {
            Some(tree) => tree,
            None => return Ok(Vec::new()),
        };

        let expected = table.total();
        let mut result = Vec::with_capacity(expected.min(MAX_PREALLOC) as usize);
        let mut bits = BitReader::new(reader);

        while (result.len() as u64) < expected {
            match tree.decode_symbol(&mut bits) {
                Ok(byte) => result.push(byte),
                Err(CodecError::TruncatedStream) => {
                    debug!(
                        "bitstream ran out after {} of {} symbols",
                        result.len(),
                        expected
                    );
                    return Err(CodecError::TruncatedStream);
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "decompressed {} bytes from {} distinct symbols",
            result.len(),
            table.len()
        );
        Ok(result)
    }

    /// Reads `reader` to the end, then writes the compressed form to `writer`.
    pub fn compress_stream<R: Read, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<CompressionStats> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let (encoded, stats) = self.compress_with_stats(&data)?;
        writer.write_all(&encoded)?;
        writer.flush()?;
        Ok(stats)
    }

    /// Decodes everything before writing, so a failure leaves `writer`
    /// untouched. Returns the number of bytes written.
    pub fn decompress_stream<R: Read, W: Write>(&self, reader: R, mut writer: W) -> Result<u64> {
        let decoded = self.decode_from(reader)?;
        write_all_flushed(&mut writer, &decoded)?;
        Ok(decoded.len() as u64)
    }

    /// The input is read and compressed before `output` is created, so a
    /// failure leaves no output file and `input` may equal `output`.
    pub fn compress_file(&self, input: &Path, output: &Path) -> Result<CompressionStats> {
        let capacity = self.config.io_buffer_capacity;
        debug!("compressing {} -> {}", input.display(), output.display());
        let mut reader = BufReader::with_capacity(capacity, File::open(input)?);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        drop(reader);

        let (encoded, stats) = self.compress_with_stats(&data)?;

        let writer = BufWriter::with_capacity(capacity, File::create(output)?);
        write_all_flushed(writer, &encoded)?;
        Ok(stats)
    }

    pub fn decompress_file(&self, input: &Path, output: &Path) -> Result<u64> {
        let capacity = self.config.io_buffer_capacity;
        let reader = BufReader::with_capacity(capacity, File::open(input)?);
        let decoded = self.decode_from(reader)?;

        debug!("decompressing {} -> {}", input.display(), output.display());
        let writer = BufWriter::with_capacity(capacity, File::create(output)?);
        write_all_flushed(writer, &decoded)?;
        Ok(decoded.len() as u64)
    }
}

fn write_all_flushed<W: Write>(mut writer: W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}
