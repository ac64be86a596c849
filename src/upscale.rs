//! Backscatter upscaling: packet bytes to shift-register waveform words.
//!
//! The backscatter modulator replays a bit stream through a peripheral
//! shift register clocked well above the PHY symbol rate. Each 2-bit
//! group of a packet byte (MSB first) selects one precomputed 32-bit
//! word whose toggle pattern, mixed with the carrier, lands the sideband
//! at the chosen frequency offset. At 1 Mbps a byte expands to four
//! words; at 2 Mbps two input bits fit in 16 output bits, so a byte
//! expands to two words against a fixed -3 MHz table.
//!
//! Neither routine bounds-checks `dst`; callers size it once with
//! [`crate::consts::UPSCALED_MAX_WORDS`].

/// Sideband offset from the carrier for 1 Mbps upscaling.
///
/// Positive and negative offsets of the same magnitude use mirrored
/// tables: the same words in reversed symbol order.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum CarrierOffset {
    /// -4.5 MHz below the carrier.
    Neg45,
    /// -4.0 MHz below the carrier.
    Neg40,
    /// -3.5 MHz below the carrier.
    Neg35,
    /// -3.0 MHz below the carrier.
    Neg30,
    /// -1.5 MHz below the carrier.
    Neg15,
    /// +1.5 MHz above the carrier.
    Pos15,
    /// +3.0 MHz above the carrier.
    Pos30,
    /// +3.5 MHz above the carrier.
    Pos35,
    /// +4.0 MHz above the carrier.
    Pos40,
    /// +4.5 MHz above the carrier.
    Pos45,
}

impl CarrierOffset {
    /// The four waveform words for this offset, indexed by 2-bit symbol.
    const fn lookup(self) -> [u32; 4] {
        match self {
            CarrierOffset::Neg45 => [0x3333_3333, 0xdb24_3333, 0x3333_db24, 0xdb24_db24],
            CarrierOffset::Neg40 => [0x9831_67ce, 0x6c26_67ce, 0x9831_93d9, 0x6c26_93d9],
            CarrierOffset::Neg35 => [0x38e7_38e7, 0xcccc_38e7, 0x38e7_cccc, 0xcccc_cccc],
            CarrierOffset::Neg30 => [0x711c_8ee3, 0x9831_8ee3, 0x711c_67ce, 0x9831_67ce],
            CarrierOffset::Neg15 => [0x00ff_00ff, 0xf0f0_00ff, 0x00ff_f0f0, 0xf0f0_f0f0],
            CarrierOffset::Pos15 => [0xf0f0_f0f0, 0x00ff_f0f0, 0xf0f0_00ff, 0x00ff_00ff],
            CarrierOffset::Pos30 => [0x9831_67ce, 0x711c_67ce, 0x9831_8ee3, 0x711c_8ee3],
            CarrierOffset::Pos35 => [0xcccc_cccc, 0x38e7_cccc, 0xcccc_38e7, 0x38e7_38e7],
            CarrierOffset::Pos40 => [0x6c26_93d9, 0x9831_93d9, 0x6c26_67ce, 0x9831_67ce],
            CarrierOffset::Pos45 => [0xdb24_db24, 0x3333_db24, 0xdb24_3333, 0x3333_3333],
        }
    }
}

/// Waveform half-words for 2 Mbps, fixed at -3 MHz from the carrier.
static UPSCALE_LOOKUP_2MBPS: [u32; 4] = [0x0000_f0f0, 0x0000_ccf0, 0x0000_f0cc, 0x0000_cccc];

/// Upscales a 1 Mbps (or coded) packet into waveform words.
///
/// Each byte becomes four words, one per 2-bit symbol taken MSB first.
/// Returns the waveform length in bytes, `packet.len() << 4`. `dst`
/// must hold `packet.len() * 4` words.
pub fn upscale_1mbps(dst: &mut [u32], packet: &[u8], offset: CarrierOffset) -> usize {
    let lookup = offset.lookup();
    let mut i = 0;
    for &byte in packet {
        dst[i] = lookup[((byte >> 6) & 0x03) as usize];
        dst[i + 1] = lookup[((byte >> 4) & 0x03) as usize];
        dst[i + 2] = lookup[((byte >> 2) & 0x03) as usize];
        dst[i + 3] = lookup[(byte & 0x03) as usize];
        i += 4;
    }
    packet.len() << 4
}

/// Upscales a 2 Mbps packet into waveform words.
///
/// Two 2-bit symbols pack into each word, the first in the low half.
/// Returns the waveform length in bytes, `packet.len() << 3`. `dst`
/// must hold `packet.len() * 2` words.
pub fn upscale_2mbps(dst: &mut [u32], packet: &[u8]) -> usize {
    let mut i = 0;
    for &byte in packet {
        dst[i] = UPSCALE_LOOKUP_2MBPS[((byte >> 6) & 0x03) as usize]
            | (UPSCALE_LOOKUP_2MBPS[((byte >> 4) & 0x03) as usize] << 16);
        dst[i + 1] = UPSCALE_LOOKUP_2MBPS[((byte >> 2) & 0x03) as usize]
            | (UPSCALE_LOOKUP_2MBPS[(byte & 0x03) as usize] << 16);
        i += 2;
    }
    packet.len() << 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upscale_1mbps_reference_words() {
        let mut dst = [0u32; 8];
        let len = upscale_1mbps(&mut dst, &[0x1b], CarrierOffset::Neg30);
        assert_eq!(len, 16);
        assert_eq!(
            &dst[..4],
            [0x711c_8ee3, 0x9831_8ee3, 0x711c_67ce, 0x9831_67ce]
        );

        let len = upscale_1mbps(&mut dst, &[0xd6, 0x00], CarrierOffset::Pos35);
        assert_eq!(len, 32);
        assert_eq!(
            dst,
            [
                0x38e7_38e7, 0x38e7_cccc, 0x38e7_cccc, 0xcccc_38e7, 0xcccc_cccc, 0xcccc_cccc,
                0xcccc_cccc, 0xcccc_cccc,
            ]
        );
    }

    #[test]
    fn test_positive_offsets_mirror_negative() {
        // Mirrored tables: symbol k on +f equals symbol 3-k on -f.
        for (pos, neg) in [
            (CarrierOffset::Pos15, CarrierOffset::Neg15),
            (CarrierOffset::Pos30, CarrierOffset::Neg30),
            (CarrierOffset::Pos35, CarrierOffset::Neg35),
            (CarrierOffset::Pos40, CarrierOffset::Neg40),
            (CarrierOffset::Pos45, CarrierOffset::Neg45),
        ] {
            let p = pos.lookup();
            let n = neg.lookup();
            for k in 0..4 {
                assert_eq!(p[k], n[3 - k], "{pos:?} vs {neg:?} symbol {k}");
            }
        }
    }

    #[test]
    fn test_upscale_2mbps_reference_words() {
        let mut dst = [0u32; 2];
        let len = upscale_2mbps(&mut dst, &[0x1b]);
        assert_eq!(len, 8);
        assert_eq!(dst, [0xccf0_f0f0, 0xcccc_f0cc]);

        let len = upscale_2mbps(&mut dst, &[0xd6]);
        assert_eq!(len, 8);
        assert_eq!(dst, [0xccf0_cccc, 0xf0cc_ccf0]);
    }

    #[test]
    fn test_empty_packet() {
        let mut dst = [0u32; 1];
        assert_eq!(upscale_1mbps(&mut dst, &[], CarrierOffset::Neg30), 0);
        assert_eq!(upscale_2mbps(&mut dst, &[]), 0);
        assert_eq!(dst, [0]);
    }

    #[test]
    fn test_maximum_coded_frame_fills_worst_case_buffer() {
        use crate::consts::{CODED_MAX_PACKET_SIZE, UPSCALED_MAX_WORDS};

        let packet = [0x5a_u8; CODED_MAX_PACKET_SIZE];
        let mut dst = [0u32; UPSCALED_MAX_WORDS];
        let len = upscale_1mbps(&mut dst, &packet, CarrierOffset::Neg45);
        assert_eq!(len, CODED_MAX_PACKET_SIZE << 4);
        assert_eq!(len / 4, UPSCALED_MAX_WORDS);
        // 0x5a is symbols 1,1,2,2; every word must be a table entry.
        let lookup = CarrierOffset::Neg45.lookup();
        assert!(dst.chunks_exact(4).all(|words| {
            words == [lookup[1], lookup[1], lookup[2], lookup[2]]
        }));
    }
}
