//! Offset-keyed XOR used by Magic Candle save-files (`*.MCS`).
//!
//! Every stored byte is the plain byte XORed with a key derived from its
//! absolute position in the file:
//!
//! ```text
//! key(offset) = (offset + 0xA5) & 0xFF
//! stored      = plain ^ key(offset)
//! plain       = stored ^ key(offset)
//! ```
//!
//! XOR is an involution, so [`transform`] both encrypts and decrypts. The
//! caller picks the direction by which value it passes in.
//!
//! Worked example: the byte `0x3E` at offset `0x1CD` decodes with key
//! `(0x1CD + 0xA5) & 0xFF = 0x72` to `0x4C`, the letter `L`.

/// Key bias added to the offset before truncation.
pub const KEY_BIAS: u8 = 0xA5;

/// Key for the byte stored at `offset`.
#[inline]
pub fn key(offset: usize) -> u8 {
    // Only the low byte of the offset contributes to the key.
    (offset as u8).wrapping_add(KEY_BIAS)
}

/// Encrypt or decrypt the byte at `offset`.
#[inline]
pub fn transform(offset: usize, byte: u8) -> u8 {
    byte ^ key(offset)
}

/// Apply [`transform`] to a whole slice whose first byte sits at absolute
/// offset `base`.
pub fn transform_slice(base: usize, data: &[u8]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| transform(base.wrapping_add(i), b))
        .collect()
}

/// In-place variant of [`transform_slice`].
pub fn transform_in_place(base: usize, data: &mut [u8]) {
    for (i, b) in data.iter_mut().enumerate() {
        *b = transform(base.wrapping_add(i), *b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        assert_eq!(transform(0x1CD, 0x3E), 0x4C);
        assert_eq!(transform(0x1CD, 0x4C), 0x3E);
    }

    #[test]
    fn test_key_wraps_on_low_byte() {
        assert_eq!(key(0), 0xA5);
        assert_eq!(key(0x5B), 0x00);
        assert_eq!(key(0x100), key(0));
        assert_eq!(key(0xFFFF_FFFF), key(0xFF));
    }

    #[test]
    fn test_involution() {
        for offset in [0usize, 1, 0x5A, 0x5B, 0xFF, 0x100, 0x1CD, 0xFFFF_FFFF] {
            for b in 0..=255u8 {
                assert_eq!(transform(offset, transform(offset, b)), b);
            }
        }
    }

    #[test]
    fn test_slice_matches_bytewise() {
        let plain = b"NONE\0L";
        let stored = transform_slice(0x1C8, plain);
        assert_eq!(stored, [0x23, 0x21, 0x21, 0x35, 0x71, 0x3E]);

        let mut round = stored.clone();
        transform_in_place(0x1C8, &mut round);
        assert_eq!(&round, plain);
    }
}
