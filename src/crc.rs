//! Table-driven CRC-24 over the advertising PDU.
//!
//! Parameterization: polynomial `0x00065B`, width 24, initial value
//! `0x555555`, input and output non-reflected, zero output XOR. The table
//! is indexed 4 bits at a time, so each input byte takes two table steps.
//! The CRC is computed over the *unwhitened* PDU bytes only and appended
//! big-endian before whitening.

/// A 24-bit CRC state, carried in the low 24 bits.
pub type Crc24 = u32;

/// Nibble-indexed CRC table for polynomial `0x00065B`.
static CRC_TABLE: [u32; 16] = [
    0x000000, 0x00065b, 0x000cb6, 0x000aed, 0x00196c, 0x001f37, 0x0015da, 0x001381, 0x0032d8,
    0x003483, 0x003e6e, 0x003835, 0x002bb4, 0x002def, 0x002702, 0x002159,
];

/// Returns the initial CRC state.
#[inline]
pub fn crc_init() -> Crc24 {
    0x0055_5555
}

/// Feeds `data` through the CRC, nibble by nibble, returning the new state
/// masked to 24 bits.
pub fn crc_update(mut crc: Crc24, data: &[u8]) -> Crc24 {
    for &byte in data {
        let idx = ((crc >> 20) ^ u32::from(byte >> 4)) & 0x0f;
        crc = (CRC_TABLE[idx as usize] ^ (crc << 4)) & 0x00ff_ffff;
        let idx = ((crc >> 20) ^ u32::from(byte)) & 0x0f;
        crc = (CRC_TABLE[idx as usize] ^ (crc << 4)) & 0x00ff_ffff;
    }
    crc & 0x00ff_ffff
}
