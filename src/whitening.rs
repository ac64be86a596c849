//! BLE data whitening: LFSR-derived scrambling pattern and XOR application.
//!
//! BLE whitens the PDU and CRC with a channel-seeded 7-bit LFSR
//! (polynomial x^7 + x^4 + 1) to avoid long runs of identical bits, which
//! would starve a receiver's timing recovery. The whitening sequence is a
//! pure function of the channel index, so it is generated once per channel
//! into a lookup table and applied with a plain XOR on every packet update.
//!
//! Because this codec holds bytes MSB-first, the LFSR is seeded with the
//! *bit-reversed* channel index and emits its feedback bit into the output
//! MSB-first; XORing twice with the same table restores the original bytes.

use crate::bits::reverse;

/// Fills `lookup` with the whitening sequence for `channel`.
///
/// The LFSR is seeded as `(reverse(channel) >> 1) | 0x01`. For every output
/// byte the register shifts eight times: the feedback bit is bit 6, the new
/// bit 4 is feedback XOR bit 3, and the feedback bit itself is emitted into
/// the output MSB-first.
///
/// Deterministic: two calls with the same channel produce identical tables.
/// The caller validates the channel range; see
/// [`Packet::init`](crate::packet::Packet::init).
pub fn generate_whitening_lookup(channel: u8, lookup: &mut [u8]) {
    let mut lfsr = (reverse(channel) >> 1) | 0x01;
    for slot in lookup.iter_mut() {
        let mut out = 0u8;
        for bit in 0..8 {
            let feedback = (lfsr & 0x40) >> 6;
            let sum = feedback ^ ((lfsr & 0x08) >> 3);
            lfsr = feedback | ((lfsr << 1) & 0x6e) | (sum << 4);
            out |= feedback << (7 - bit);
        }
        *slot = out;
    }
}

/// XORs `data` with `lookup` elementwise, in place.
///
/// Involutive: whitening twice with the same table restores the input.
/// The spans must match; only `data.len()` table bytes are consumed.
pub fn whiten(data: &mut [u8], lookup: &[u8]) {
    for (byte, mask) in data.iter_mut().zip(lookup) {
        *byte ^= mask;
    }
}
