//! MCS - Magic Candle save-file (`<NAME>1.MCS` .. `<NAME>8.MCS`).
//!
//! There is **no header and no magic**; the file is a flat run of one-byte
//! fields, each obfuscated with [`crate::crypto::offset_xor`]. Reading it is
//! a two-step affair: [`crate::layout`] splits the offsets into rows, then
//! every filled cell is decoded with the XOR keyed by its absolute offset.
//!
//! ## Layout
//! ```text
//! [0x000] STR  of heroes 1..6   (6 bytes)
//! [0x006] next attribute        (6 bytes)
//! ...
//! [0x1C8] hero names begin; several records are not multiples of six,
//!         see layout::MAGIC_CANDLE_BREAKS
//! ...
//! ```
//! Only byte positions are modelled; field meanings are left to callers.
//!
//! ## Editing
//! Edits arrive as [`ModificationGroup`]s: a start offset plus plain byte
//! values written at consecutive offsets. A group that does not fit inside
//! the file is skipped with a warning and the remaining groups still apply.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::Result;
use crate::crypto::offset_xor::transform;
use crate::layout::{BLOCK_SIZE, Cell, FilledCell, ForcedBreakSet, Row, RowScanner};

/// A single plain byte to write at an absolute offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modification {
    pub offset: usize,
    pub value: u8,
}

/// Plain byte values written at `start`, `start + 1`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationGroup {
    /// Offset of the first value.
    pub start: usize,
    /// Plain values in write order.
    pub values: Vec<u8>,
}

impl ModificationGroup {
    pub fn new(start: usize, values: impl Into<Vec<u8>>) -> Self {
        Self {
            start,
            values: values.into(),
        }
    }

    /// Expand into per-byte modifications with auto-incremented offsets.
    pub fn modifications(&self) -> impl Iterator<Item = Modification> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &value)| Modification {
                offset: self.start + i,
                value,
            })
    }

    /// One past the last offset written by this group.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.values.len())
    }

    fn fits(&self, len: usize) -> bool {
        self.start < len && self.end() <= len
    }
}

/// Outcome of [`apply_modifications`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReport {
    /// Every offset written, in ascending order.
    pub touched: BTreeSet<usize>,
    /// Start offsets of the groups that were skipped.
    pub skipped: Vec<usize>,
}

/// Decode a save-file buffer into rows. No cell is marked as modified.
pub fn decode_view(buf: &[u8], breaks: &ForcedBreakSet) -> Vec<Row> {
    decode_view_marked(buf, breaks, &BTreeSet::new())
}

/// Decode a save-file buffer into rows, flagging the cells whose offset is
/// in `touched`.
pub fn decode_view_marked(
    buf: &[u8],
    breaks: &ForcedBreakSet,
    touched: &BTreeSet<usize>,
) -> Vec<Row> {
    let rows: Vec<Row> = RowScanner::new(buf.len(), breaks)
        .map(|span| {
            let mut cells = [Cell::Empty; BLOCK_SIZE];
            for (slot, offset) in cells.iter_mut().zip(span.offsets()) {
                let stored = buf[offset];
                *slot = Cell::Filled(FilledCell {
                    offset,
                    stored,
                    plain: transform(offset, stored),
                    modified: touched.contains(&offset),
                });
            }
            Row {
                start: span.start,
                cells,
            }
        })
        .collect();
    log::debug!("decoded {} bytes into {} rows", buf.len(), rows.len());
    rows
}

/// Encode and write every group into `buf`.
///
/// Groups that start at or beyond the end of the buffer, or that would run
/// past it, are skipped whole and logged; they never abort the batch.
pub fn apply_modifications(buf: &mut [u8], groups: &[ModificationGroup]) -> EditReport {
    let mut report = EditReport::default();
    for group in groups {
        if !group.fits(buf.len()) {
            log::warn!(
                "skipping {} value(s) at {:#x}: file is only {:#x} bytes long",
                group.values.len(),
                group.start,
                buf.len()
            );
            report.skipped.push(group.start);
            continue;
        }
        for m in group.modifications() {
            buf[m.offset] = transform(m.offset, m.value);
            report.touched.insert(m.offset);
        }
    }
    report
}

/// Decode the plain byte at `offset`, if it is inside the buffer.
pub fn plain_at(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).map(|&b| transform(offset, b))
}

/// An owned save-file buffer together with its row configuration and the
/// offsets edited so far.
#[derive(Debug, Clone)]
pub struct SaveFile {
    data: Vec<u8>,
    breaks: ForcedBreakSet,
    touched: BTreeSet<usize>,
}

impl SaveFile {
    /// Wrap raw save-file bytes using the Magic Candle row breaks.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::with_breaks(data, ForcedBreakSet::magic_candle())
    }

    /// Wrap raw save-file bytes with a custom break set.
    pub fn with_breaks(data: Vec<u8>, breaks: ForcedBreakSet) -> Self {
        Self {
            data,
            breaks,
            touched: BTreeSet::new(),
        }
    }

    /// Load a save-file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    /// Decoded rows; cells edited through [`SaveFile::apply`] are flagged.
    pub fn rows(&self) -> Vec<Row> {
        decode_view_marked(&self.data, &self.breaks, &self.touched)
    }

    /// Apply edit groups to the buffer. See [`apply_modifications`].
    pub fn apply(&mut self, groups: &[ModificationGroup]) -> EditReport {
        let report = apply_modifications(&mut self.data, groups);
        self.touched.extend(report.touched.iter().copied());
        report
    }

    /// Plain byte at `offset`.
    pub fn plain_at(&self, offset: usize) -> Option<u8> {
        plain_at(&self.data, offset)
    }

    /// Offsets written so far.
    pub fn touched(&self) -> &BTreeSet<usize> {
        &self.touched
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stored (encoded) bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the wrapper, returning the stored bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
