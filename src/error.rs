//! Library-wide error and result types.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout candlekit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Error messages are kept intentionally terse; callers that need richer
/// context should wrap `Error` in their own type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The buffer ended before all expected bytes could be read.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// An offset would read or write outside the buffer.
    #[error("invalid offset or size")]
    InvalidRange,
    /// A modification group started with a token that is not a hex offset.
    #[error("line {line}: invalid hexadecimal offset '{token}'")]
    InvalidOffset { line: usize, token: String },
    /// A modification value is not a decimal number in `0..=255`.
    #[error("line {line}: invalid byte value '{token}'")]
    InvalidValue { line: usize, token: String },
    /// The backup (or the copy to a new destination) could not be created.
    /// Nothing has been modified when this is returned.
    #[error("backup to {} failed: {source}", path.display())]
    Backup { path: PathBuf, source: io::Error },
    /// The final write of the edited buffer failed.
    #[error("write to {} failed: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error happened before any byte of the asset was touched.
    pub fn is_pre_mutation(&self) -> bool {
        !matches!(self, Error::Write { .. })
    }
}
