//! Legacy advertising PDU construction.
//!
//! A legacy advertising PDU is a 2-byte header, a 6-byte advertising
//! address, and up to 31 bytes of advertising data. The PHY transmits every
//! field LSB-first while this representation is assembled MSB-first, so the
//! builder bit-reverses every byte and copies the address and data in
//! reverse byte order. The result is consumed by the packet assembler,
//! which never needs to touch bit order again.

use crate::bits::reverse;
use crate::consts::{ADVERTISING_ADDRESS_SIZE, MAX_ADVERTISING_DATA_SIZE, MAX_PDU_SIZE};
use crate::error::Error;

use heapless::Vec;

/// Advertising-channel PDU types, by 4-bit type code.
///
/// Only [`AdvNonconnInd`](PduType::AdvNonconnInd) is produced by this crate
/// (backscatter tags are non-connectable beacons); the full set is kept for
/// header decoding.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[repr(u8)]
pub enum PduType {
    /// Connectable undirected advertising.
    AdvInd = 0b0000,
    /// Connectable directed advertising.
    AdvDirectInd = 0b0001,
    /// Non-connectable undirected advertising.
    AdvNonconnInd = 0b0010,
    /// Scan request.
    ScanReq = 0b0011,
    /// Scan response.
    ScanRsp = 0b0100,
    /// Connection request.
    ConnectInd = 0b0101,
    /// Scannable undirected advertising.
    AdvScanInd = 0b0110,
    /// Extended advertising indication.
    AdvExtInd = 0b0111,
    /// Auxiliary connection response.
    AuxConnectRsp = 0b1000,
}

/// An assembled legacy advertising PDU, in transmission bit order.
///
/// Built fresh each transmission cycle from the session address and the
/// current payload; owned exclusively by the packet-assembler call that
/// consumes it.
#[derive(Debug, Clone)]
pub struct Pdu {
    bytes: Vec<u8, MAX_PDU_SIZE>,
}

impl Pdu {
    /// Builds an `ADV_NONCONN_IND` PDU from `address` and `payload`.
    ///
    /// Header byte 0 carries the bit-reversed 4-bit PDU type in its high
    /// nibble; the low nibble is reserved and zeroed (ChSel/TxAdd/RxAdd are
    /// not modeled). Header byte 1 is the bit-reversed total field length.
    /// Address and payload bytes are bit-reversed and copied in reverse
    /// byte order.
    ///
    /// # Errors
    /// [`Error::InvalidLength`] if `address` is not exactly 6 bytes or
    /// `payload` exceeds 31 bytes.
    pub fn build_legacy_adv(address: &[u8], payload: &[u8]) -> Result<Self, Error> {
        if address.len() != ADVERTISING_ADDRESS_SIZE || payload.len() > MAX_ADVERTISING_DATA_SIZE {
            return Err(Error::InvalidLength);
        }

        let pdu_type = PduType::AdvNonconnInd;
        let mut bytes: Vec<u8, MAX_PDU_SIZE> = Vec::new();
        let _ = bytes.push((reverse(pdu_type as u8) >> 4) << 4);
        let _ = bytes.push(reverse((address.len() + payload.len()) as u8));

        for &byte in address.iter().rev() {
            let _ = bytes.push(reverse(byte));
        }
        for &byte in payload.iter().rev() {
            let _ = bytes.push(reverse(byte));
        }

        Ok(Self { bytes })
    }

    /// The PDU bytes, ready for the packet assembler.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Total PDU length: `2 + address_len + payload_len`.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; a built PDU carries at least its header and address.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
