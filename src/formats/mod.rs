//! Parsers for Magic Candle binary formats.
//!
//! Both parsers follow the same conventions:
//!
//! * **Owned buffers** - assets are small (a few KiB), so they are loaded
//!   whole and parsed from a `&[u8]`. Edits take an exclusive `&mut [u8]`;
//!   nothing aliases the file on disk.
//! * **Positions are absolute** - every offset in the public API counts
//!   from the first byte of the asset, never from a row or a tile.
//! * **Crypto is separate** - [`mcs`] delegates the byte transform to
//!   [`crate::crypto::offset_xor`] and the row structure to
//!   [`crate::layout`].
//!
//! ## Format overview
//!
//! | Module  | Format | Description |
//! |---------|--------|-------------|
//! | [`mcs`] | MCS    | Party save-file; headerless, every byte XORed with a key derived from its offset |
//! | [`til`] | TIL    | Tile atlas; big-endian offset table followed by 16×14 nibble-packed tiles |

pub mod mcs;
pub mod til;
