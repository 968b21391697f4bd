//! TIL - Magic Candle EGA tile atlas (`TILES/EGAxx.TIL`).
//!
//! A table of up to 128 tile offsets followed by the tiles themselves.
//! Each tile is a 16×14 bitmap of 4-bit indices into the
//! [EGA palette](crate::palette), two pixels packed per byte.
//!
//! ## Layout
//! ```text
//! [0x000] Header: 128 × u16 BE tile offsets, 0xFFFF = end of table (0x100 bytes)
//! [0x100] Padding / separator                                       (2 bytes)
//! [0x102] Tile 0
//! [...]   Tile 1 .. Tile N-1
//! [...]   Trailing zero bytes of unknown use
//! ```
//!
//! ## Tile offsets
//! A header value `v` points at absolute offset `v + 0xFF + 3`, i.e. it is
//! relative to the byte just after the separator. Once the sentinel is seen
//! the rest of the header is never consulted, even if it holds something
//! other than `0xFFFF`.
//!
//! ## Tile (0x72 bytes)
//! ```text
//! [0x00] Row 0   (8 bytes = 16 pixels)
//! [0x08] Row 1
//! ...
//! [0x68] Row 13
//! [0x70] Padding (2 bytes)
//! ```
//! Within a byte the high nibble is the left pixel and the low nibble the
//! right pixel.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::palette;
use crate::utils::{be_u16, slice_at};
use crate::{Error, Result};

/// Size of the offset table in bytes.
pub const HEADER_SIZE: usize = 0x100;
/// Maximum number of tiles in one atlas.
pub const MAX_TILES: usize = HEADER_SIZE / 2;
/// Header value marking the end of the table.
pub const SENTINEL: u16 = 0xFFFF;
/// Added to a header value to get an absolute tile offset.
pub const TILE_DATA_BIAS: usize = 0xFF + 3;

/// Tile width in pixels.
pub const TILE_WIDTH: usize = 16;
/// Tile height in pixels.
pub const TILE_HEIGHT: usize = 14;
/// Bytes per tile row.
pub const TILE_PACKED_WIDTH: usize = TILE_WIDTH / 2;
/// Pixel bytes per tile (the 2 padding bytes are not included).
pub const TILE_BYTES: usize = TILE_PACKED_WIDTH * TILE_HEIGHT;

/// The raw offset table of an atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileHeader {
    /// Header values before the sentinel, in file order.
    pub entries: Vec<u16>,
}

impl TileHeader {
    /// Parse the offset table at the start of `buf`.
    ///
    /// Reading stops at the first [`SENTINEL`], after [`MAX_TILES`]
    /// entries, or when `buf` runs out, whichever comes first.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let region = &buf[..buf.len().min(HEADER_SIZE)];
        let mut r = Cursor::new(region);
        let mut entries = Vec::new();
        for _ in 0..MAX_TILES {
            let value = match be_u16(&mut r) {
                Ok(v) => v,
                Err(Error::UnexpectedEof) => break,
                Err(e) => return Err(e),
            };
            if value == SENTINEL {
                break;
            }
            entries.push(value);
        }
        log::debug!("tile header lists {} tile(s)", entries.len());
        Ok(Self { entries })
    }

    /// Absolute offsets of the tiles, in header order.
    pub fn tile_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|&v| tile_start(v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Absolute offset for a header value.
#[inline]
pub fn tile_start(value: u16) -> usize {
    value as usize + TILE_DATA_BIAS
}

/// Parse the header of `buf` into absolute tile offsets.
pub fn parse_header(buf: &[u8]) -> Result<Vec<usize>> {
    Ok(TileHeader::parse(buf)?.tile_offsets().collect())
}

/// A decoded 16×14 tile. `pixels[y][x]` is a palette index in `0..=15`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub pixels: [[u8; TILE_WIDTH]; TILE_HEIGHT],
}

impl Tile {
    /// Palette index at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if `x >= TILE_WIDTH` or `y >= TILE_HEIGHT`.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y][x]
    }

    /// One row of palette indices.
    pub fn row(&self, y: usize) -> &[u8; TILE_WIDTH] {
        &self.pixels[y]
    }

    /// Resolve every pixel through the EGA palette.
    pub fn rgb(&self) -> [[(u8, u8, u8); TILE_WIDTH]; TILE_HEIGHT] {
        self.pixels
            .map(|row| row.map(|index| palette::lookup(index).rgb))
    }

    /// Re-pack the tile into its 112-byte on-disk form.
    pub fn pack(&self) -> [u8; TILE_BYTES] {
        let mut out = [0u8; TILE_BYTES];
        for (y, row) in self.pixels.iter().enumerate() {
            for (x, pair) in row.chunks_exact(2).enumerate() {
                out[y * TILE_PACKED_WIDTH + x] = (pair[0] & 0x0F) << 4 | (pair[1] & 0x0F);
            }
        }
        out
    }
}

/// Expand the packed tile starting at absolute offset `start`.
///
/// Returns [`Error::UnexpectedEof`] if the tile runs past the end of `buf`,
/// or [`Error::InvalidRange`] if `start` is too large to address it at all.
pub fn unpack(buf: &[u8], start: usize) -> Result<Tile> {
    let mut pixels = [[0u8; TILE_WIDTH]; TILE_HEIGHT];
    for (y, row) in pixels.iter_mut().enumerate() {
        let row_start = start
            .checked_add(y * TILE_PACKED_WIDTH)
            .ok_or(Error::InvalidRange)?;
        let packed = slice_at(buf, row_start, TILE_PACKED_WIDTH)?;
        for (x, &b) in packed.iter().enumerate() {
            row[x * 2] = (b & 0xF0) >> 4;
            row[x * 2 + 1] = b & 0x0F;
        }
    }
    Ok(Tile { pixels })
}

/// A fully decoded tile atlas.
#[derive(Debug, Clone)]
pub struct TileAtlas {
    /// Offset table.
    pub header: TileHeader,
    /// Tiles in header order; `tiles[i]` starts at `offsets[i]`.
    pub tiles: Vec<Tile>,
    /// Absolute start offset of each tile.
    pub offsets: Vec<usize>,
}

impl TileAtlas {
    /// Parse the header and unpack every tile it lists.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let header = TileHeader::parse(buf)?;
        let offsets: Vec<usize> = header.tile_offsets().collect();
        let tiles = offsets
            .iter()
            .map(|&start| unpack(buf, start))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            header,
            tiles,
            offsets,
        })
    }

    /// Read and parse an atlas from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read(path)?)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate over `(offset, tile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Tile)> {
        self.offsets.iter().copied().zip(self.tiles.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with(values: &[u16]) -> Vec<u8> {
        let mut buf = vec![0xFFu8; HEADER_SIZE];
        for (i, v) in values.iter().enumerate() {
            buf[i * 2..i * 2 + 2].copy_from_slice(&v.to_be_bytes());
        }
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    #[test]
    fn test_header_stops_at_sentinel() {
        let mut buf = vec![0x00, 0x05, 0xFF, 0xFF, 0x00, 0x10];
        buf.resize(HEADER_SIZE, 0);
        // 5 + 0xFF + 3; the trailing 0x0010 is never read.
        assert_eq!(parse_header(&buf).unwrap(), [0x107]);
        assert_eq!(tile_start(5), 0x107);
    }

    #[test]
    fn test_header_without_sentinel_reads_all_slots() {
        let values: Vec<u16> = (0..MAX_TILES as u16).map(|i| i * 0x72).collect();
        let buf = header_with(&values);
        let header = TileHeader::parse(&buf).unwrap();
        assert_eq!(header.len(), MAX_TILES);
        assert_eq!(header.tile_offsets().nth(1), Some(0x72 + 0x102));
    }

    #[test]
    fn test_header_ignores_bytes_after_region() {
        let mut buf = header_with(&[0; MAX_TILES]);
        buf.extend_from_slice(&[0x00, 0x01]);
        assert_eq!(TileHeader::parse(&buf).unwrap().len(), MAX_TILES);
    }

    #[test]
    fn test_truncated_header_ends_table() {
        let buf = [0x00, 0x00, 0x00, 0x72, 0x01];
        assert_eq!(parse_header(&buf).unwrap(), [0x102, 0x174]);
    }

    #[test]
    fn test_unpack_nibble_order() {
        let mut buf = vec![0u8; TILE_BYTES];
        buf[0] = 0xAB;
        let tile = unpack(&buf, 0).unwrap();
        assert_eq!(tile.pixel(0, 0), 0xA);
        assert_eq!(tile.pixel(1, 0), 0xB);
        assert_eq!(tile.pixel(2, 0), 0x0);
    }

    #[test]
    fn test_unpack_rows_are_eight_bytes_apart() {
        let mut buf = vec![0u8; 4 + TILE_BYTES];
        buf[4 + 13 * TILE_PACKED_WIDTH + 7] = 0x3C;
        let tile = unpack(&buf, 4).unwrap();
        assert_eq!(tile.row(13)[14..], [0x3u8, 0xC]);
        assert!(tile.pixels[..13].iter().flatten().all(|&p| p == 0));
    }

    #[test]
    fn test_unpack_truncated() {
        let buf = vec![0u8; TILE_BYTES - 1];
        assert!(matches!(unpack(&buf, 0), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_unpack_offset_overflow() {
        let buf = vec![0u8; TILE_BYTES];
        assert!(matches!(unpack(&buf, usize::MAX), Err(Error::InvalidRange)));
        assert!(matches!(
            unpack(&buf, usize::MAX - TILE_PACKED_WIDTH),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn test_pack_inverts_unpack() {
        let data: Vec<u8> = (0..TILE_BYTES as u8).map(|b| b.wrapping_mul(37)).collect();
        let tile = unpack(&data, 0).unwrap();
        assert_eq!(tile.pack().as_slice(), data.as_slice());
    }

    #[test]
    fn test_atlas_parse() {
        let mut buf = header_with(&[0x00, 0x72]);
        let mut first = [0x11u8; TILE_BYTES + 2];
        first[TILE_BYTES..].fill(0);
        buf.extend_from_slice(&first);
        buf.extend_from_slice(&[0xF0u8; TILE_BYTES + 2]);

        let atlas = TileAtlas::parse(&buf).unwrap();
        assert_eq!(atlas.offsets, [0x102, 0x174]);
        assert_eq!(atlas.tiles[0].pixel(5, 5), 0x1);
        assert_eq!(atlas.tiles[1].row(0)[..2], [0xFu8, 0x0]);
        assert_eq!(atlas.tiles[1].rgb()[0][0], (255, 255, 255));
        assert_eq!(atlas.tiles[1].rgb()[0][1], (0, 0, 0));
    }

    #[test]
    fn test_atlas_with_dangling_offset_fails() {
        let buf = header_with(&[0x1000]);
        assert!(TileAtlas::parse(&buf).is_err());
    }
}
