//! **candlekit** - codecs for the binary assets of *The Magic Candle*
//! (1989, MS-DOS EGA release).
//!
//! # Supported formats
//! | Module | Format |
//! |--------|--------|
//! | [`formats::mcs`] | MCS - offset-XOR obfuscated save-file |
//! | [`formats::til`] | TIL - EGA tile atlas, two 4-bit pixels per byte |
//!
//! # Supporting modules
//! | Module | Purpose |
//! |--------|---------|
//! | [`crypto::offset_xor`] | The save-file byte transform |
//! | [`layout`] | Splitting save-files into six-cell rows |
//! | [`palette`] | The fixed 16-colour EGA palette |
//! | [`edits`] | Parsing `offset value value ...` edit lines |
//! | [`persist`] | Backup-then-write of edited save-files |
//!
//! The library decodes and re-encodes; rendering rows to a console and
//! exporting tiles as images are left to callers.

pub mod crypto;
pub mod edits;
pub mod error;
pub mod formats;
pub mod layout;
pub mod palette;
pub mod persist;
pub(crate) mod utils;

pub use error::{Error, Result};
