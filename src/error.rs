use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("corrupt header: {reason}")]
    CorruptHeader { reason: String },

    #[error("bitstream ended before every symbol was decoded")]
    TruncatedStream,

    #[error("byte {symbol:#04x} occurs more than {} times", u32::MAX)]
    FrequencyOverflow { symbol: u8 },

    #[error("decoded output does not match the original input")]
    VerificationFailed,

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    pub(crate) fn corrupt_header(reason: impl Into<String>) -> Self {
        CodecError::CorruptHeader {
            reason: reason.into(),
        }
    }
}
