use std::fmt;

/// Size breakdown of one compressed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_len: u64,
    pub encoded_len: u64,
    /// Bytes taken by the frequency table.
    pub header_len: u64,
    /// Code bits in the body, padding excluded.
    pub body_bits: u64,
    pub padding_bits: u8,
    pub distinct_symbols: usize,
}

impl CompressionStats {
    pub(crate) fn new(
        original_len: u64,
        header_len: u64,
        body_bits: u64,
        distinct_symbols: usize,
    ) -> Self {
        let padding_bits = ((8 - body_bits % 8) % 8) as u8;
        let body_len = (body_bits + padding_bits as u64) / 8;
        CompressionStats {
            original_len,
            encoded_len: header_len + body_len,
            header_len,
            body_bits,
            padding_bits,
            distinct_symbols,
        }
    }

    /// Encoded size over original size. 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.encoded_len as f64 / self.original_len as f64
    }

    /// Average code length in bits per input byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.body_bits as f64 / self.original_len as f64
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes ({:.1}%), {} symbols, header {} B, body {} bits + {} padding",
            self.original_len,
            self.encoded_len,
            self.ratio() * 100.0,
            self.distinct_symbols,
            self.header_len,
            self.body_bits,
            self.padding_bits
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_padding_and_length() {
        let stats = CompressionStats::new(9, 19, 17, 3);
        assert_eq!(stats.padding_bits, 7);
        assert_eq!(stats.encoded_len, 19 + 3);

        let aligned = CompressionStats::new(8, 9, 16, 1);
        assert_eq!(aligned.padding_bits, 0);
        assert_eq!(aligned.encoded_len, 11);
    }

    #[test]
    fn test_ratio_of_empty_input() {
        let stats = CompressionStats::new(0, 4, 0, 0);
        assert_eq!(stats.encoded_len, 4);
        assert_eq!(stats.ratio(), 0.0);
        assert_eq!(stats.bits_per_symbol(), 0.0);
    }
}
