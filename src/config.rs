//! Endpoint configuration.

use crate::consts::{MAX_ADVERTISING_DATA_SIZE, PAYLOAD_SAMPLE_OFFSET};
use crate::upscale::CarrierOffset;

pub use crate::packet::PhyEncoding;

/// What to transmit when the sensor fails to produce a fresh sample.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum SamplePolicy {
    /// Keep the previous sample bytes in the payload and transmit anyway.
    /// The sequence number still advances, so the receiver can tell a
    /// repeated reading from a repeated packet.
    #[default]
    ReuseStale,
    /// Zero the sample region before transmitting.
    ZeroFill,
}

/// Static configuration of one backscatter endpoint.
///
/// All fields are fixed for the lifetime of the endpoint; anything that
/// changes per packet (sequence number, sample bytes) lives in the
/// endpoint itself.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct EndpointConfig {
    /// Link identifier, also the first payload byte and the uplink
    /// time-slot index.
    pub link_id: u8,
    /// Channel the uplink packet is whitened for.
    pub channel: u8,
    /// Channel the downlink trigger is received on.
    pub downlink_channel: u8,
    /// PHY shape of the uplink packet.
    pub encoding: PhyEncoding,
    /// Sideband offset for 1 Mbps and coded uplinks. Ignored at 2 Mbps,
    /// which always modulates at -3 MHz.
    pub carrier_offset: CarrierOffset,
    /// Advertising address, most significant byte first. Downlink
    /// triggers are matched against the same bytes.
    pub address: [u8; 6],
    /// Advertising-data length in bytes, at most 31 and at least 4 to
    /// leave room for the link id and sequence number.
    pub payload_len: usize,
    /// Behavior on sensor sampling failure.
    pub sample_policy: SamplePolicy,
}

impl EndpointConfig {
    /// Whether the fixed fields describe a buildable packet.
    pub const fn is_valid(&self) -> bool {
        self.payload_len >= PAYLOAD_SAMPLE_OFFSET && self.payload_len <= MAX_ADVERTISING_DATA_SIZE
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            link_id: 0,
            channel: 0,
            downlink_channel: 0,
            encoding: PhyEncoding::CodedS8,
            carrier_offset: CarrierOffset::Neg30,
            address: [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc],
            payload_len: 24,
            sample_policy: SamplePolicy::ReuseStale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EndpointConfig::default().is_valid());
    }

    #[test]
    fn test_payload_length_bounds() {
        let mut config = EndpointConfig::default();
        config.payload_len = 3;
        assert!(!config.is_valid());
        config.payload_len = 4;
        assert!(config.is_valid());
        config.payload_len = 31;
        assert!(config.is_valid());
        config.payload_len = 32;
        assert!(!config.is_valid());
    }
}
