use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CodecError, Result};

/// Number of distinct byte values.
pub const MAX_SYMBOLS: usize = 256;

const SIZE_FIELD_LEN: usize = 4;
const ENTRY_LEN: usize = 1 + 4;

/// Occurrence count of every byte value present in an input.
///
/// Symbols that never occur are not stored, so a table never holds a zero
/// count. Iteration is in ascending symbol order, which is also the order
/// entries are persisted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u32>,
}

impl FrequencyTable {
    pub fn compute(bytes: &[u8]) -> Result<Self> {
        let mut histogram = [0u64; MAX_SYMBOLS];
        for &byte in bytes {
            histogram[byte as usize] += 1;
        }

        let mut counts = BTreeMap::new();
        for (symbol, &count) in histogram.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let symbol = symbol as u8;
            let count =
                u32::try_from(count).map_err(|_| CodecError::FrequencyOverflow { symbol })?;
            counts.insert(symbol, count);
        }

        Ok(FrequencyTable { counts })
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, symbol: u8) -> Option<u32> {
        self.counts.get(&symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

    /// Sum of all counts, i.e. the length of the input the table describes.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    /// Size in bytes of the serialized header.
    pub fn serialized_len(&self) -> usize {
        SIZE_FIELD_LEN + self.len() * ENTRY_LEN
    }

    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        // at most 256 entries, always fits
        writer.write_i32::<BigEndian>(self.counts.len() as i32)?;
        for (symbol, count) in self.iter() {
            writer.write_u8(symbol)?;
            writer.write_u32::<BigEndian>(count)?;
        }
        Ok(())
    }

    pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self> {
        let size = reader.read_i32::<BigEndian>().map_err(header_read_error)?;
        if size < 0 {
            return Err(CodecError::corrupt_header(format!(
                "negative table size {}",
                size
            )));
        }
        let size = size as usize;
        if size > MAX_SYMBOLS {
            return Err(CodecError::corrupt_header(format!(
                "table size {} exceeds {} symbols",
                size, MAX_SYMBOLS
            )));
        }

        let mut counts = BTreeMap::new();
        for _ in 0..size {
            let symbol = reader.read_u8().map_err(header_read_error)?;
            let count = reader
                .read_u32::<BigEndian>()
                .map_err(header_read_error)?;

            if count == 0 {
                return Err(CodecError::corrupt_header(format!(
                    "zero count for byte {:#04x}",
                    symbol
                )));
            }
            if counts.insert(symbol, count).is_some() {
                return Err(CodecError::corrupt_header(format!(
                    "byte {:#04x} listed twice",
                    symbol
                )));
            }
        }

        Ok(FrequencyTable { counts })
    }
}

fn header_read_error(e: io::Error) -> CodecError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        CodecError::corrupt_header("stream ended inside the frequency table")
    } else {
        CodecError::Io(e)
    }
}
