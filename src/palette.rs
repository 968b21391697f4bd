//! The fixed 16-colour EGA palette used by every Magic Candle asset.
//!
//! Tile pixels are 4-bit indices into this table. Each entry carries the
//! true EGA RGB value (what an image exporter should use) and an ANSI
//! console attribute that only approximates it. Console terminals expose
//! eight base colours, so indices `0x8..=0xF` reuse the attribute of their
//! dark counterpart and set [`PaletteEntry::bright`] instead.
//!
//! | Index | Name | RGB |
//! |-------|------|-----|
//! | `0x0` | Black | `00 00 00` |
//! | `0x1` | Blue | `00 00 AA` |
//! | `0x2` | Green | `00 AA 00` |
//! | `0x3` | Cyan | `00 AA AA` |
//! | `0x4` | Red | `AA 00 00` |
//! | `0x5` | Magenta | `AA 00 AA` |
//! | `0x6` | Yellow | `AA 55 00` |
//! | `0x7` | White/Light Grey | `AA AA AA` |
//! | `0x8` | Dark Grey | `55 55 55` |
//! | `0x9` | Highlighted Blue | `55 55 FF` |
//! | `0xA` | Highlighted Green | `55 FF 55` |
//! | `0xB` | Highlighted Cyan | `55 FF FF` |
//! | `0xC` | Highlighted Red | `FF 55 55` |
//! | `0xD` | Highlighted Magenta | `FF 55 FF` |
//! | `0xE` | Highlighted Yellow | `FF FF 55` |
//! | `0xF` | White | `FF FF FF` |

/// Number of palette entries.
pub const PALETTE_LEN: usize = 16;

/// One colour of the EGA palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Palette index (`0..=15`).
    pub index: u8,
    /// EGA colour as `(r, g, b)`.
    pub rgb: (u8, u8, u8),
    /// Human-readable colour name.
    pub name: &'static str,
    /// ANSI SGR foreground code (`30..=37`) approximating the colour.
    pub ansi: u8,
    /// Whether the console should render the attribute in its bright variant.
    pub bright: bool,
}

const fn entry(index: u8, rgb: (u8, u8, u8), name: &'static str, ansi: u8) -> PaletteEntry {
    PaletteEntry {
        index,
        rgb,
        name,
        ansi,
        bright: index > 7,
    }
}

/// The palette table, indexed by palette index.
pub static EGA: [PaletteEntry; PALETTE_LEN] = [
    entry(0x0, (0x00, 0x00, 0x00), "Black", 30),
    entry(0x1, (0x00, 0x00, 0xAA), "Blue", 34),
    entry(0x2, (0x00, 0xAA, 0x00), "Green", 32),
    entry(0x3, (0x00, 0xAA, 0xAA), "Cyan", 36),
    entry(0x4, (0xAA, 0x00, 0x00), "Red", 31),
    entry(0x5, (0xAA, 0x00, 0xAA), "Magenta", 35),
    entry(0x6, (0xAA, 0x55, 0x00), "Yellow", 33),
    entry(0x7, (0xAA, 0xAA, 0xAA), "White/Light Grey", 37),
    entry(0x8, (0x55, 0x55, 0x55), "Dark Grey", 30),
    entry(0x9, (0x55, 0x55, 0xFF), "Highlighted Blue", 34),
    entry(0xA, (0x55, 0xFF, 0x55), "Highlighted Green", 32),
    entry(0xB, (0x55, 0xFF, 0xFF), "Highlighted Cyan", 36),
    entry(0xC, (0xFF, 0x55, 0x55), "Highlighted Red", 31),
    entry(0xD, (0xFF, 0x55, 0xFF), "Highlighted Magenta", 35),
    entry(0xE, (0xFF, 0xFF, 0x55), "Highlighted Yellow", 33),
    entry(0xF, (0xFF, 0xFF, 0xFF), "White", 37),
];

/// Look up a palette index.
///
/// # Panics
/// Panics if `index > 15`. Every pixel produced by this crate is masked
/// into range, so reaching the panic means a caller broke that invariant.
#[inline]
pub fn lookup(index: u8) -> &'static PaletteEntry {
    &EGA[index as usize]
}

/// Non-panicking variant of [`lookup`].
#[inline]
pub fn get(index: u8) -> Option<&'static PaletteEntry> {
    EGA.get(index as usize)
}
