//! The error types that are reported by the block stream and the codec.

use std::io;
use std::path::PathBuf;

/// Failures of the buffered block stream.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("unable to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to read the input: {0}")]
    Read(#[source] io::Error),
    /// The input is exhausted. This is the normal way for a scan to end.
    #[error("reached the end of the input")]
    Eof,
    #[error("unable to write the output: {0}")]
    Write(#[source] io::Error),
}

/// The reason a compression or a decompression was aborted.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("byte {byte:#04x} at offset {offset} is not 7-bit text")]
    UnsupportedByte { byte: u8, offset: u64 },
    #[error("invalid repetition count {0}")]
    InvalidRunLength(u8),
    #[error("run-code of {0} zero bytes")]
    ZeroRun(u8),
    #[error("the stream ends inside a run-code")]
    Truncated,
}

/// The errors that the library reports to its callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("compression failed: {0}")]
    CompressionFailed(#[source] CodecError),
    #[error("decompression failed: {0}")]
    DecompressionFailed(#[source] CodecError),
}

impl Error {
    /// Returns the block stream error at the root of this error, if any.
    pub fn io_cause(&self) -> Option<&IoError> {
        match self {
            Error::Io(err) => Some(err),
            Error::CompressionFailed(CodecError::Io(err))
            | Error::DecompressionFailed(CodecError::Io(err)) => Some(err),
            _ => None,
        }
    }
}
