//! Forward error correction for the LE Coded PHY.
//!
//! The coded PHY splits a frame into two FEC blocks. Block 1 carries the
//! access address, the Coding Indicator, and three terminator bits, always
//! at S=8. Block 2 carries the PDU and CRC at the frame's own coding
//! scheme, followed by its terminator. Each payload bit runs through a
//! rate-1/2 convolutional encoder whose 2-bit output symbol indexes a
//! spreading table: S=8 expands every bit to a full byte, S=2 to two bits.

use crate::consts::CODED_PREAMBLE_SIZE;
use crate::packet::{Packet, PhyEncoding};

/// One byte per input bit, selected by the encoder's 2-bit symbol.
static FEC_S8_LOOKUP: [u8; 4] = [0x33, 0xc3, 0x3c, 0xcc];

/// Two bits per input bit, selected by the encoder's 2-bit symbol.
static FEC_S2_LOOKUP: [u8; 4] = [0b00, 0b10, 0b01, 0b11];

/// Rate-1/2 convolutional encoder with a three-bit shift register.
///
/// The register starts at zero and is threaded through both blocks of a
/// packet; the terminator bits at the end of each block drain it back to
/// zero, so block boundaries see a clean state.
struct ConvEncoder {
    s1: u8,
    s2: u8,
    s3: u8,
}

impl ConvEncoder {
    const fn new() -> Self {
        Self { s1: 0, s2: 0, s3: 0 }
    }

    /// Encodes one input bit into a 2-bit symbol and shifts the register.
    fn encode_bit(&mut self, bit: u8) -> u8 {
        let symbol = (bit ^ self.s1 ^ self.s2 ^ self.s3) | ((bit ^ self.s2 ^ self.s3) << 1);
        self.s3 = self.s2;
        self.s2 = self.s1;
        self.s1 = bit;
        symbol
    }

    /// Spreads the bits of `byte` (MSB first) at S=8 into `dst`.
    fn encode_byte_s8(&mut self, byte: u8, dst: &mut [u8], mut i: usize) -> usize {
        for j in 0..8 {
            let bit = (byte >> (7 - j)) & 1;
            dst[i] = FEC_S8_LOOKUP[self.encode_bit(bit) as usize];
            i += 1;
        }
        i
    }

    /// Spreads the bits of `byte` (MSB first) at S=2 into two bytes.
    fn encode_byte_s2(&mut self, byte: u8, dst: &mut [u8], i: usize) -> usize {
        let mut temp: u16 = 0;
        for j in 0..8 {
            let bit = (byte >> (7 - j)) & 1;
            temp = (temp << 2) | u16::from(FEC_S2_LOOKUP[self.encode_bit(bit) as usize]);
        }
        dst[i] = (temp >> 8) as u8;
        dst[i + 1] = temp as u8;
        i + 2
    }
}

/// Encodes an assembled coded-PHY frame into its over-the-air form.
///
/// Copies the ten-byte preamble verbatim, then emits Block 1 (access
/// address, Coding Indicator, TERM1) at S=8 and Block 2 (PDU and CRC,
/// then TERM2) at the packet's coding scheme. Returns the number of
/// bytes written.
///
/// `dst` must hold at least [`crate::consts::CODED_MAX_PACKET_SIZE`]
/// bytes; the caller sizes it once for the worst case.
pub fn encode_packet(packet: &Packet, dst: &mut [u8]) -> usize {
    debug_assert!(packet.encoding().is_coded());

    let frame = packet.frame();
    dst[..CODED_PREAMBLE_SIZE].copy_from_slice(&frame[..CODED_PREAMBLE_SIZE]);
    let mut i = CODED_PREAMBLE_SIZE;

    let mut encoder = ConvEncoder::new();

    // Block 1: access address, then CI and TERM1 packed into one 5-bit
    // group, always at S=8.
    for &byte in &frame[CODED_PREAMBLE_SIZE..CODED_PREAMBLE_SIZE + 4] {
        i = encoder.encode_byte_s8(byte, dst, i);
    }
    let trailer = packet.encoding().coding_indicator() << 3;
    for j in 0..5 {
        let bit = (trailer >> (4 - j)) & 1;
        dst[i] = FEC_S8_LOOKUP[encoder.encode_bit(bit) as usize];
        i += 1;
    }

    // Block 2: PDU and CRC at the packet's own coding, then TERM2.
    let body = &frame[CODED_PREAMBLE_SIZE + 4..];
    match packet.encoding() {
        PhyEncoding::CodedS2 => {
            for &byte in body {
                i = encoder.encode_byte_s2(byte, dst, i);
            }
            let mut temp: u16 = 0;
            for _ in 0..4 {
                temp = (temp << 2) | u16::from(FEC_S2_LOOKUP[encoder.encode_bit(0) as usize]);
            }
            dst[i] = temp as u8;
            i + 1
        }
        _ => {
            for &byte in body {
                i = encoder.encode_byte_s8(byte, dst, i);
            }
            for _ in 0..3 {
                dst[i] = FEC_S8_LOOKUP[encoder.encode_bit(0) as usize];
                i += 1;
            }
            i
        }
    }
}
