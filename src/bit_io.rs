//! MSB-first bit packing on top of `Write`/`Read`.
//!
//! `BitWriter` pads the final partial byte with zero bits. `BitReader` has no
//! idea where the padding starts; callers stop reading once they have decoded
//! what they expect.

use std::io::{self, Read, Write};

use crate::hufftree::Code;

#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    // pending bits, right-aligned
    buffer: u8,
    filled: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            buffer: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | bit as u8;
        self.filled += 1;
        self.bits_written += 1;

        if self.filled == 8 {
            self.inner.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.filled = 0;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Number of data bits written so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flushes the partial byte (zero padded in its low bits) and hands back
    /// the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.filled > 0 {
            let padded = self.buffer << (8 - self.filled);
            self.inner.write_all(&[padded])?;
            self.buffer = 0;
            self.filled = 0;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            remaining: 0,
        }
    }

    /// Returns `Ok(None)` once the source is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
            self.current = byte[0];
            self.remaining = 8;
        }

        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1 == 1))
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
