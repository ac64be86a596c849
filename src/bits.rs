//! Byte-level bit-order reversal.
//!
//! The over-the-air bit order for BLE is LSB-first while this codec builds
//! every field most-significant-bit-first, so each byte crossing the API
//! boundary goes through [`reverse`] exactly once.

/// Bit-reversal lookup for a single nibble.
static NIBBLE_LOOKUP: [u8; 16] = [
    0x0, 0x8, 0x4, 0xc, 0x2, 0xa, 0x6, 0xe, 0x1, 0x9, 0x5, 0xd, 0x3, 0xb, 0x7, 0xf,
];

/// Returns `byte` with its bit order flipped (bit 7 becomes bit 0, etc.).
#[inline]
pub fn reverse(byte: u8) -> u8 {
    (NIBBLE_LOOKUP[(byte & 0x0f) as usize] << 4) | NIBBLE_LOOKUP[(byte >> 4) as usize]
}
