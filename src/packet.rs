//! Packet assembly: preamble + access address + whitened PDU + CRC.
//!
//! A [`Packet`] is created once per channel selection: `init` writes the
//! encoding-specific preamble and the fixed access address, generates the
//! channel's whitening table, and fills in the PDU/CRC tail. Every
//! transmission cycle afterwards only calls [`Packet::update`], which
//! recomputes and re-whitens the PDU+CRC span in place; the preamble and
//! access-address bytes are never touched again.

use crate::bits::reverse;
use crate::consts::{
    ACCESS_ADDRESS, ACCESS_ADDRESS_SIZE, CODED_MAX_PACKET_SIZE, CODED_PREAMBLE_SIZE, CRC_SIZE,
    MAX_CHANNEL, MAX_PDU_SIZE, MIN_PDU_SIZE, UNCODED_PREAMBLE_SIZE_1MBPS,
    UNCODED_PREAMBLE_SIZE_2MBPS, WHITENING_SIZE,
};
use crate::crc::{crc_init, crc_update};
use crate::error::Error;
use crate::pdu::Pdu;
use crate::whitening::{generate_whitening_lookup, whiten};

/// The PHY a packet is shaped for. Fixed for the life of a session.
///
/// The encoding determines the preamble length (1, 2, or 10 bytes), the
/// coding indicator for the coded PHYs, and which upscale path the frame
/// takes.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PhyEncoding {
    /// Uncoded 1 Mbps PHY.
    Uncoded1M,
    /// Uncoded 2 Mbps PHY.
    Uncoded2M,
    /// LE Coded PHY, S=2 (500 kbps).
    CodedS2,
    /// LE Coded PHY, S=8 (125 kbps).
    CodedS8,
}

impl PhyEncoding {
    /// Preamble length in bytes for this encoding.
    pub const fn preamble_len(self) -> usize {
        match self {
            PhyEncoding::Uncoded1M => UNCODED_PREAMBLE_SIZE_1MBPS,
            PhyEncoding::Uncoded2M => UNCODED_PREAMBLE_SIZE_2MBPS,
            PhyEncoding::CodedS2 | PhyEncoding::CodedS8 => CODED_PREAMBLE_SIZE,
        }
    }

    /// Whether this encoding goes through the FEC encoder.
    pub const fn is_coded(self) -> bool {
        matches!(self, PhyEncoding::CodedS2 | PhyEncoding::CodedS8)
    }

    /// The 2-bit Coding Indicator carried in FEC Block 1.
    pub(crate) const fn coding_indicator(self) -> u8 {
        match self {
            PhyEncoding::CodedS2 => 0x02,
            _ => 0x00,
        }
    }
}

/// An assembled, whitened PHY frame plus its channel whitening table.
///
/// The whitening table is immutable after `init` for a given channel. The
/// frame buffer is sized for the worst-case coded frame; `frame_len` marks
/// the valid span.
#[derive(Debug, Clone)]
pub struct Packet {
    whitening_lookup: [u8; WHITENING_SIZE],
    frame: [u8; CODED_MAX_PACKET_SIZE],
    frame_len: usize,
    encoding: PhyEncoding,
    pdu_len: usize,
}

impl Packet {
    /// Creates a packet for `channel`, seeding the preamble and access
    /// address, then filling the PDU/CRC tail via [`Packet::update`].
    ///
    /// The preamble is ten repetitions of `0x3C` for the coded PHYs (an
    /// alternating-bit training sequence for receiver AGC and clock
    /// recovery), one bit-reversed `0xAA` for 1 Mbps, or two for 2 Mbps.
    /// The access address is the fixed legacy value `0x8E89BED6`, written
    /// least-significant byte first with each byte bit-reversed.
    ///
    /// # Errors
    /// [`Error::InvalidChannel`] if `channel > 39`;
    /// [`Error::InvalidPduLength`] if the PDU length is outside `[6, 39]`.
    pub fn init(channel: u8, pdu: &Pdu, encoding: PhyEncoding) -> Result<Self, Error> {
        if channel > MAX_CHANNEL {
            return Err(Error::InvalidChannel);
        }
        if pdu.len() < MIN_PDU_SIZE || pdu.len() > MAX_PDU_SIZE {
            return Err(Error::InvalidPduLength);
        }

        let mut frame = [0u8; CODED_MAX_PACKET_SIZE];
        let mut i = 0;
        match encoding {
            PhyEncoding::CodedS2 | PhyEncoding::CodedS8 => {
                frame[..CODED_PREAMBLE_SIZE].fill(0x3c);
                i = CODED_PREAMBLE_SIZE;
            }
            PhyEncoding::Uncoded1M => {
                frame[i] = reverse(0xaa);
                i += 1;
            }
            PhyEncoding::Uncoded2M => {
                frame[i] = reverse(0xaa);
                frame[i + 1] = reverse(0xaa);
                i += 2;
            }
        }

        for byte in ACCESS_ADDRESS.to_le_bytes() {
            frame[i] = reverse(byte);
            i += 1;
        }

        let mut whitening_lookup = [0u8; WHITENING_SIZE];
        generate_whitening_lookup(channel, &mut whitening_lookup);

        let mut packet = Self {
            whitening_lookup,
            frame,
            frame_len: i,
            encoding,
            pdu_len: pdu.len(),
        };
        packet.update(pdu)?;
        Ok(packet)
    }

    /// Rewrites the PDU/CRC tail of the frame and re-whitens it.
    ///
    /// Copies the PDU immediately after the access address, computes the
    /// CRC-24 over the unwhitened PDU bytes, appends the three big-endian
    /// CRC bytes, and whitens exactly the PDU+CRC span from lookup offset
    /// 0. Idempotent: the same PDU reproduces a byte-identical frame.
    ///
    /// # Errors
    /// [`Error::InvalidPduLength`] if the PDU length differs from the one
    /// this packet was initialized with.
    pub fn update(&mut self, pdu: &Pdu) -> Result<(), Error> {
        if pdu.len() != self.pdu_len {
            return Err(Error::InvalidPduLength);
        }

        let start = self.encoding.preamble_len() + ACCESS_ADDRESS_SIZE;
        let end = start + pdu.len();
        self.frame[start..end].copy_from_slice(pdu.as_bytes());

        let crc = crc_update(crc_init(), pdu.as_bytes());
        self.frame[end] = (crc >> 16) as u8;
        self.frame[end + 1] = (crc >> 8) as u8;
        self.frame[end + 2] = crc as u8;
        self.frame_len = end + CRC_SIZE;

        whiten(
            &mut self.frame[start..self.frame_len],
            &self.whitening_lookup,
        );
        Ok(())
    }

    /// The assembled frame bytes.
    pub fn frame(&self) -> &[u8] {
        &self.frame[..self.frame_len]
    }

    /// Frame length in bytes.
    pub fn len(&self) -> usize {
        self.frame_len
    }

    /// Always false; an initialized packet carries at least its preamble.
    pub fn is_empty(&self) -> bool {
        self.frame_len == 0
    }

    /// The PHY encoding this packet was initialized with.
    pub fn encoding(&self) -> PhyEncoding {
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: [u8; 6] = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc];
    const PAYLOAD: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd,
        0xef,
    ];

    fn reference_pdu() -> Pdu {
        Pdu::build_legacy_adv(&ADDRESS, &PAYLOAD).unwrap()
    }

    #[test]
    fn test_rejects_invalid_channel() {
        let pdu = reference_pdu();
        assert_eq!(
            Packet::init(40, &pdu, PhyEncoding::Uncoded1M).unwrap_err(),
            Error::InvalidChannel
        );
        assert!(Packet::init(39, &pdu, PhyEncoding::Uncoded1M).is_ok());
    }

    #[test]
    fn test_reference_frame_channel_37_uncoded_1m() {
        // Golden vector for the end-to-end scenario: address
        // 12:34:56:78:9A:BC, 16-byte payload, channel 37, uncoded 1 Mbps.
        let expected: [u8; 32] = [
            0x55, 0x6b, 0x7d, 0x91, 0x71, 0xf1, 0x23, 0xd7, 0xdc, 0xa2, 0x8f, 0x4a, 0x45, 0x59,
            0x3f, 0x5d, 0x83, 0x8f, 0x4c, 0xdb, 0x47, 0x95, 0x24, 0x00, 0x9a, 0x9f, 0x68, 0x08,
            0x9b, 0xfb, 0x42, 0x5f,
        ];
        let pdu = reference_pdu();
        let packet = Packet::init(37, &pdu, PhyEncoding::Uncoded1M).unwrap();
        assert_eq!(packet.frame(), expected);

        // The whole pipeline must be reproducible byte-for-byte.
        let again = Packet::init(37, &reference_pdu(), PhyEncoding::Uncoded1M).unwrap();
        assert_eq!(again.frame(), expected);
    }

    #[test]
    fn test_update_is_idempotent() {
        let pdu = reference_pdu();
        let mut packet = Packet::init(37, &pdu, PhyEncoding::Uncoded1M).unwrap();
        let first: heapless::Vec<u8, 64> = heapless::Vec::from_slice(packet.frame()).unwrap();
        packet.update(&pdu).unwrap();
        assert_eq!(packet.frame(), first.as_slice());
    }

    #[test]
    fn test_update_leaves_preamble_and_access_address_untouched() {
        let pdu = reference_pdu();
        let mut packet = Packet::init(37, &pdu, PhyEncoding::Uncoded1M).unwrap();
        let head: [u8; 5] = packet.frame()[..5].try_into().unwrap();

        let other_payload = [0x5a; 16];
        let other = Pdu::build_legacy_adv(&ADDRESS, &other_payload).unwrap();
        packet.update(&other).unwrap();

        assert_eq!(&packet.frame()[..5], head);
        assert_ne!(
            packet.frame()[5..],
            Packet::init(37, &pdu, PhyEncoding::Uncoded1M).unwrap().frame()[5..]
        );
    }

    #[test]
    fn test_update_rejects_length_change() {
        let pdu = reference_pdu();
        let mut packet = Packet::init(37, &pdu, PhyEncoding::Uncoded1M).unwrap();
        let shorter = Pdu::build_legacy_adv(&ADDRESS, &PAYLOAD[..8]).unwrap();
        assert_eq!(packet.update(&shorter).unwrap_err(), Error::InvalidPduLength);
    }

    #[test]
    fn test_uncoded_frame_length_bounds() {
        use crate::consts::UNCODED_MAX_PACKET_SIZE;

        let min = Pdu::build_legacy_adv(&ADDRESS, &[]).unwrap();
        let max = Pdu::build_legacy_adv(&ADDRESS, &[0u8; 31]).unwrap();

        assert_eq!(Packet::init(37, &min, PhyEncoding::Uncoded1M).unwrap().len(), 16);
        assert_eq!(
            Packet::init(37, &max, PhyEncoding::Uncoded2M).unwrap().len(),
            UNCODED_MAX_PACKET_SIZE
        );
        // The 1 Mbps preamble is one byte shorter than the 2 Mbps one
        // that sizes the worst case.
        assert_eq!(
            Packet::init(37, &max, PhyEncoding::Uncoded1M).unwrap().len(),
            UNCODED_MAX_PACKET_SIZE - 1
        );
    }

    #[test]
    fn test_preamble_shapes() {
        let pdu = reference_pdu();

        let p2m = Packet::init(37, &pdu, PhyEncoding::Uncoded2M).unwrap();
        assert_eq!(p2m.len(), 33);
        assert_eq!(&p2m.frame()[..3], [0x55, 0x55, 0x6b]);

        let coded = Packet::init(0, &pdu, PhyEncoding::CodedS8).unwrap();
        assert_eq!(coded.len(), 41);
        assert_eq!(&coded.frame()[..10], [0x3c; 10]);
        // Bit-reversed access address follows the training preamble.
        assert_eq!(&coded.frame()[10..14], [0x6b, 0x7d, 0x91, 0x71]);
    }
}
