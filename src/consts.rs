//! Constants used across the BLE backscatter implementation.
//!
//! This module defines the protocol-wide constants used for buffer sizing,
//! frame layout, and link timing.
//!
//! The frame-layout values come from the BLE legacy advertising packet
//! format; the link-timing values are the reference timings for a
//! downlink-triggered backscatter endpoint.
//!
//! ## Key Concepts
//!
//! - **Frame layout**: preamble + access address + PDU + CRC, with the
//!   preamble length depending on the PHY encoding.
//! - **PDU limits**: legacy advertising allows a 6-byte address and up to
//!   31 bytes of advertising data.
//! - **Coded sizes**: the LE Coded PHY expands the frame through FEC; the
//!   worst case bounds every coded buffer.
//! - **Link timing**: wake-timer and receive-window durations for the
//!   association state machine, in RTC ticks or radio timer units.

/// Preamble length (in bytes) for the uncoded 1 Mbps PHY.
pub const UNCODED_PREAMBLE_SIZE_1MBPS: usize = 1;

/// Preamble length (in bytes) for the uncoded 2 Mbps PHY.
pub const UNCODED_PREAMBLE_SIZE_2MBPS: usize = 2;

/// Preamble length (in bytes) for the coded PHYs: ten repetitions of the
/// training byte `0x3C`.
pub const CODED_PREAMBLE_SIZE: usize = 10;

/// Length (in bytes) of the access address field.
pub const ACCESS_ADDRESS_SIZE: usize = 4;

/// The legacy advertising access address, as written in the BLE spec
/// (most-significant byte first). Each byte is bit-reversed on the air.
pub const ACCESS_ADDRESS: u32 = 0x8E89_BED6;

/// Length (in bytes) of the advertising PDU header (type + length).
pub const HEADER_SIZE: usize = 2;

/// Length (in bytes) of the advertising address inside the PDU.
pub const ADVERTISING_ADDRESS_SIZE: usize = 6;

/// Maximum length (in bytes) of legacy advertising data.
pub const MAX_ADVERTISING_DATA_SIZE: usize = 31;

/// Maximum total PDU length: header + address + advertising data.
pub const MAX_PDU_SIZE: usize = HEADER_SIZE + ADVERTISING_ADDRESS_SIZE + MAX_ADVERTISING_DATA_SIZE;

/// Minimum PDU length accepted by the packet assembler.
pub const MIN_PDU_SIZE: usize = ADVERTISING_ADDRESS_SIZE;

/// Length (in bytes) of the CRC appended to the PDU.
pub const CRC_SIZE: usize = 3;

/// Length (in bytes) of the whitening lookup table: the whitened span is
/// at most a full PDU plus its CRC.
pub const WHITENING_SIZE: usize = MAX_PDU_SIZE + CRC_SIZE;

/// Largest uncoded frame: 2 Mbps preamble + access address + whitened span.
pub const UNCODED_MAX_PACKET_SIZE: usize =
    UNCODED_PREAMBLE_SIZE_2MBPS + ACCESS_ADDRESS_SIZE + WHITENING_SIZE;

/// Size (in bytes) of FEC Block 1: the access address at S=8 (one output
/// byte per input bit) plus the 2 CI bits and 3 TERM1 bits.
pub const CODED_FEC1_SIZE: usize = (ACCESS_ADDRESS_SIZE * 8) + 2 + 3;

/// Worst-case size (in bytes) of FEC Block 2 at S=2: two output bytes per
/// input byte plus one TERM2 byte.
pub const CODED_FEC2_S2_SIZE: usize = (WHITENING_SIZE * 2) + 1;

/// Worst-case size (in bytes) of FEC Block 2 at S=8: eight output bytes per
/// input byte plus three TERM2 bytes.
pub const CODED_FEC2_S8_SIZE: usize = (WHITENING_SIZE * 8) + 3;

/// Worst-case coded frame size. Every buffer passed to
/// [`encode_packet`](crate::fec::encode_packet) must hold at least this many
/// bytes.
pub const CODED_MAX_PACKET_SIZE: usize = CODED_PREAMBLE_SIZE + CODED_FEC1_SIZE + CODED_FEC2_S8_SIZE;

/// Highest valid BLE channel index.
pub const MAX_CHANNEL: u8 = 39;

/// `u32` sample words emitted per packet byte on the 1 Mbps upscale path.
pub const UPSCALE_WORDS_PER_BYTE_1MBPS: usize = 4;

/// `u32` sample words emitted per packet byte on the 2 Mbps upscale path.
pub const UPSCALE_WORDS_PER_BYTE_2MBPS: usize = 2;

/// Worst-case upscaled buffer length in `u32` words: a maximum coded frame
/// expanded on the 1 Mbps path.
pub const UPSCALED_MAX_WORDS: usize = CODED_MAX_PACKET_SIZE * UPSCALE_WORDS_PER_BYTE_1MBPS;

/// Payload byte holding the endpoint's link identifier.
pub const PAYLOAD_LINK_ID_OFFSET: usize = 0;

/// First payload byte of the little-endian 16-bit sequence number.
pub const PAYLOAD_SEQ_OFFSET: usize = 1;

/// First payload byte of the sensor sample block.
pub const PAYLOAD_SAMPLE_OFFSET: usize = 4;

/// Delay (in microseconds) between the end of a downlink and the start of
/// the uplink slot grid: the downlink transmitter needs this long to turn
/// around into receive mode.
pub const DL_UL_DELAY_US: u32 = 400;

/// Duration (in microseconds) of one uplink packet slot. Endpoints offset
/// their transmission by `link_id` slots.
pub const UL_PKT_DURATION_US: u32 = 900;

/// Receive timeout while disassociated, in radio timer units (~16.7 s):
/// effectively continuous listening.
pub const RX_DISASSOC_TIMEOUT: u32 = 0x00FF_FFFF;

/// Receive-window timeout while associated, in radio timer units (~2 ms).
pub const RX_ASSOC_TIMEOUT: u32 = 1800;

/// Consecutive downlink timeouts tolerated while associated before the
/// endpoint drops back to disassociated.
pub const ASSOC_DISASSOC_THRESH: u8 = 10;

/// Wake-timer duration (RTC ticks) from a received downlink to the next
/// receive window.
pub const RTC_DL_TO_RX_TICKS: u32 = 393;

/// Wake-timer duration (RTC ticks) from a downlink timeout to the next
/// receive window. Shorter than [`RTC_DL_TO_RX_TICKS`] because the timeout
/// itself already consumed part of the period.
pub const RTC_TIMEOUT_TO_RX_TICKS: u32 = 373;

/// Buffer size for received downlink frames.
pub const MAX_DOWNLINK_FRAME_SIZE: usize = 255;
