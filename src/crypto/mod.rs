//! Byte-level obfuscation used by Magic Candle assets.
//!
//! Parsers in [`crate::formats`] call into this module to turn stored bytes
//! into plain values and back. Nothing here is cryptographically meaningful;
//! the game only hides its save data from casual hex editing.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`offset_xor`] | Per-byte XOR keyed by absolute file offset (save-files) |

pub mod offset_xor;
