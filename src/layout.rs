//! Row layout of save-files.
//!
//! Save-files have no header and no field markers. They roughly follow a
//! six-values-per-record pattern (one value per hero in the party), so the
//! natural way to read one is as rows of [`BLOCK_SIZE`] cells. A handful of
//! structural boundaries do not land on a multiple of six; at those offsets
//! the current row is closed early and the remaining slots are left empty.
//!
//! ## Row closing rule
//! After the byte at offset `o` is placed in the current row, the row is
//! closed when any of these holds:
//! 1. the row now holds [`BLOCK_SIZE`] cells,
//! 2. `o` is in the [`ForcedBreakSet`],
//! 3. `o` is the last offset of the buffer.
//!
//! The next row starts at `o + 1` with an empty fill count.
//!
//! [`RowScanner`] only deals with positions. Decoding the values in each
//! row is the job of [`crate::formats::mcs`].

use std::collections::BTreeSet;

/// Cells per row.
pub const BLOCK_SIZE: usize = 6;

/// Forced breaks observed in Magic Candle save-files.
pub const MAGIC_CANDLE_BREAKS: [usize; 7] = [0x1CC, 0x1F1, 0x22C, 0x26F, 0x3A3, 0x430, 0x479];

/// Offsets at which a row always closes, full or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedBreakSet(BTreeSet<usize>);

impl ForcedBreakSet {
    /// Build a set from arbitrary offsets.
    pub fn new<I: IntoIterator<Item = usize>>(offsets: I) -> Self {
        Self(offsets.into_iter().collect())
    }

    /// No forced breaks: every row is full except possibly the last.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// The breaks used by Magic Candle save-files.
    pub fn magic_candle() -> Self {
        Self::new(MAGIC_CANDLE_BREAKS)
    }

    /// Whether the row closes after `offset`.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.0.contains(&offset)
    }

    /// Iterate over the break offsets in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

/// Position of one row: the filled cells cover `start..start + filled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    /// Absolute offset of the first cell.
    pub start: usize,
    /// Number of filled cells (`1..=BLOCK_SIZE`).
    pub filled: usize,
}

impl RowSpan {
    /// Offsets of the filled cells.
    pub fn offsets(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.filled
    }

    /// Number of trailing empty slots.
    pub fn padding(&self) -> usize {
        BLOCK_SIZE - self.filled
    }
}

/// Walks offsets `0..len` and yields one [`RowSpan`] per closed row.
///
/// A scanner is created per decode call and owns all of its state.
#[derive(Debug)]
pub struct RowScanner<'a> {
    breaks: &'a ForcedBreakSet,
    len: usize,
    next: usize,
    row_start: usize,
    fill: usize,
}

impl<'a> RowScanner<'a> {
    /// Scan a buffer of `len` bytes.
    pub fn new(len: usize, breaks: &'a ForcedBreakSet) -> Self {
        Self {
            breaks,
            len,
            next: 0,
            row_start: 0,
            fill: 0,
        }
    }

    fn closes_after(&self, offset: usize) -> bool {
        self.fill == BLOCK_SIZE || self.breaks.contains(offset) || offset + 1 == self.len
    }
}

impl Iterator for RowScanner<'_> {
    type Item = RowSpan;

    fn next(&mut self) -> Option<RowSpan> {
        while self.next < self.len {
            let offset = self.next;
            self.next += 1;
            self.fill += 1;

            if self.closes_after(offset) {
                let span = RowSpan {
                    start: self.row_start,
                    filled: self.fill,
                };
                self.row_start = offset + 1;
                self.fill = 0;
                return Some(span);
            }
        }
        None
    }
}

/// Collect every row of a `len`-byte buffer.
pub fn scan(len: usize, breaks: &ForcedBreakSet) -> Vec<RowSpan> {
    RowScanner::new(len, breaks).collect()
}

/// One slot of a decoded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// A byte of the save-file.
    Filled(FilledCell),
    /// Padding after a forced break or at end of data.
    Empty,
}

/// A decoded save-file byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilledCell {
    /// Absolute offset in the file.
    pub offset: usize,
    /// Byte as stored on disk.
    pub stored: u8,
    /// Byte after removing the offset XOR.
    pub plain: u8,
    /// Whether this offset was written during the current session.
    pub modified: bool,
}

impl FilledCell {
    /// The plain value as a Latin-1 character, or `'.'` when that character
    /// is not printable (controls, `DEL`, the C1 block, no-break space and
    /// soft hyphen). Only meant for display; [`FilledCell::plain`] is
    /// unaffected.
    pub fn display_char(&self) -> char {
        match self.plain {
            0x20..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF => char::from(self.plain),
            _ => '.',
        }
    }
}

impl Cell {
    /// The filled cell, if any.
    pub fn filled(&self) -> Option<&FilledCell> {
        match self {
            Cell::Filled(c) => Some(c),
            Cell::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A decoded row of at most [`BLOCK_SIZE`] cells.
///
/// Filled cells always come first; empty slots only trail a row closed by
/// a forced break or by the end of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Absolute offset of the first cell.
    pub start: usize,
    /// The row's slots.
    pub cells: [Cell; BLOCK_SIZE],
}

impl Row {
    /// Iterate over the filled cells.
    pub fn filled(&self) -> impl Iterator<Item = &FilledCell> {
        self.cells.iter().filter_map(Cell::filled)
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }

    /// Number of empty slots.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Decoded values of the filled cells rendered as text.
    pub fn text(&self) -> String {
        self.filled().map(FilledCell::display_char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_rows_without_breaks() {
        let breaks = ForcedBreakSet::empty();
        let rows = scan(12, &breaks);
        assert_eq!(
            rows,
            [
                RowSpan { start: 0, filled: 6 },
                RowSpan { start: 6, filled: 6 },
            ]
        );
        assert!(rows.iter().all(|r| r.padding() == 0));
    }

    #[test]
    fn test_forced_break_closes_row_early() {
        // The third byte of the second row is offset 8.
        let breaks = ForcedBreakSet::new([8]);
        let rows = scan(18, &breaks);
        assert_eq!(rows[1], RowSpan { start: 6, filled: 3 });
        assert_eq!(rows[1].padding(), 3);
        assert_eq!(rows[2], RowSpan { start: 9, filled: 6 });
        assert_eq!(rows[3], RowSpan { start: 15, filled: 3 });
    }

    #[test]
    fn test_end_of_data_pads_last_row() {
        let rows = scan(8, &ForcedBreakSet::empty());
        assert_eq!(rows.last(), Some(&RowSpan { start: 6, filled: 2 }));
    }

    #[test]
    fn test_break_on_full_row_does_not_double_close() {
        let breaks = ForcedBreakSet::new([5]);
        let rows = scan(12, &breaks);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].start, 6);
    }

    #[test]
    fn test_empty_buffer_has_no_rows() {
        assert!(scan(0, &ForcedBreakSet::magic_candle()).is_empty());
    }

    #[test]
    fn test_rows_cover_every_offset_once() {
        let breaks = ForcedBreakSet::magic_candle();
        let rows = scan(0x500, &breaks);
        let covered: Vec<usize> = rows.iter().flat_map(RowSpan::offsets).collect();
        assert_eq!(covered, (0..0x500).collect::<Vec<_>>());
        assert!(rows.iter().all(|r| (1..=BLOCK_SIZE).contains(&r.filled)));
    }

    #[test]
    fn test_magic_candle_name_row() {
        // 0x1CC is a forced break; the row containing it ends there.
        let rows = scan(0x500, &ForcedBreakSet::magic_candle());
        let row = rows.iter().find(|r| r.offsets().contains(&0x1CC)).unwrap();
        assert_eq!(row.start + row.filled - 1, 0x1CC);
        let next = rows.iter().find(|r| r.start == 0x1CD).unwrap();
        assert_eq!(next.filled, 6);
    }

    #[test]
    fn test_display_char_substitution() {
        let mut cell = FilledCell {
            offset: 0,
            stored: 0,
            plain: b'L',
            modified: false,
        };
        assert_eq!(cell.display_char(), 'L');
        cell.plain = 0x07;
        assert_eq!(cell.display_char(), '.');
        cell.plain = 0x7F;
        assert_eq!(cell.display_char(), '.');
        cell.plain = 0xE9;
        assert_eq!(cell.display_char(), 'é');
        for hidden in [0x85, 0xA0, 0xAD] {
            cell.plain = hidden;
            assert_eq!(cell.display_char(), '.');
        }
    }
}
