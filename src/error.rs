//! Error taxonomy for the packet codec and link driver.
//!
//! Builder and assembler calls validate their arguments synchronously and
//! return [`Error`] instead of panicking; a failed call must suppress that
//! cycle's transmission. Downlink reception outcomes
//! (matched/mismatched/CRC error/timeout) are *not* errors: they are
//! expected classifications consumed by the link state machine and live in
//! [`crate::periph::ReceptionOutcome`].

use thiserror::Error;

/// Errors returned by the codec and the uplink pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The advertising address was not 6 bytes, or the advertising data
    /// exceeded 31 bytes.
    #[error("advertising address or data length out of range")]
    InvalidLength,

    /// The BLE channel index was greater than 39.
    #[error("BLE channel index out of range")]
    InvalidChannel,

    /// The PDU length was outside the legal advertising range, or changed
    /// after the packet was initialized.
    #[error("PDU length outside the legal advertising range")]
    InvalidPduLength,

    /// The backscatter transfer peripheral faulted. Fatal: the pipeline
    /// never retries a transfer.
    #[error("backscatter transfer peripheral fault")]
    PeripheralTransfer,

    /// The sensor failed to produce its startup sample. Fatal: there is no
    /// degraded-mode startup.
    #[error("sensor failed to produce a startup sample")]
    SensorStartup,
}
