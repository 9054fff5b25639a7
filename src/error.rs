use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, MonochromizeError>;

/// Errors raised while turning a 24-bit bitmap into a grayscale one.
#[derive(Debug, thiserror::Error)]
pub enum MonochromizeError {
    #[error("failed to open input file {path}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output file {path}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input truncated at row {row}: expected {expected} bytes, got {actual}")]
    TruncatedInput { row: usize, expected: usize, actual: usize },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported bit depth {0}, only 24-bit input is handled")]
    UnsupportedBitDepth(u16),

    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
