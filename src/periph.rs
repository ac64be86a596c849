//! Hardware collaborator traits and interrupt-side flags.
//!
//! The endpoint core is hardware-agnostic: the waveform replay engine,
//! the wake timer, the downlink receiver, and the sensor are all traits,
//! implemented against the target HAL on hardware and mocked in tests.

use core::sync::atomic::{AtomicBool, Ordering};

/// Replays an upscaled waveform through the backscatter modulator.
///
/// On hardware this drives a SPI peripheral fed by DMA from the waveform
/// buffer; the trait captures the configure/start/complete/teardown
/// lifecycle without naming the peripheral.
pub trait BackscatterTransfer {
    /// Transfer error type.
    type Error;

    /// Points the replay engine at `waveform` and arms it for
    /// `len_bytes` bytes of output.
    fn configure(&mut self, waveform: &[u32], len_bytes: usize) -> Result<(), Self::Error>;

    /// Starts the replay.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Whether the current replay has finished.
    fn poll_complete(&mut self) -> bool;

    /// Releases the peripheral after a completed replay.
    fn teardown(&mut self);

    /// Non-blocking wait for replay completion.
    ///
    /// # Errors
    /// [`nb::Error::WouldBlock`] until [`Self::poll_complete`] returns
    /// true.
    fn wait_complete(&mut self) -> nb::Result<(), Self::Error> {
        if self.poll_complete() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

/// A one-shot wakeup timer in RTC ticks.
pub trait WakeTimer {
    /// Arms the timer to fire after `ticks`.
    fn arm(&mut self, ticks: u32);

    /// Cancels a pending timer.
    fn disarm(&mut self);

    /// Whether an armed timer has fired.
    fn poll_expired(&mut self) -> bool;

    /// Non-blocking wait for expiry.
    ///
    /// # Errors
    /// [`nb::Error::WouldBlock`] until the timer fires.
    fn wait_expired(&mut self) -> nb::Result<(), core::convert::Infallible> {
        if self.poll_expired() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

/// Starts a downlink reception window.
///
/// Starting a window cannot fail; its outcome arrives asynchronously
/// through [`DownlinkFlags`] from the radio interrupt.
pub trait DownlinkRadio {
    /// Opens a receive window on `channel` that closes after `timeout`
    /// radio time units.
    fn receive(&mut self, channel: u8, timeout: u32);
}

/// Produces sample bytes for the uplink payload.
pub trait Sensor {
    /// Sampling error type.
    type Error;

    /// Fills `out` with one fresh sample.
    ///
    /// # Errors
    /// Implementation-defined; on failure the endpoint applies its
    /// [`crate::config::SamplePolicy`].
    fn sample(&mut self, out: &mut [u8]) -> Result<(), Self::Error>;
}

/// How a closed reception window is reported to the endpoint.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ReceptionOutcome {
    /// A valid trigger addressed to this endpoint.
    Matched,
    /// A valid frame, but not our trigger. Treated like a CRC error by
    /// the state machine.
    Mismatched,
    /// The frame failed its CRC check.
    CrcError,
    /// The window closed with nothing received.
    Timeout,
}

/// Flags posted from the radio interrupt and consumed by the main loop.
///
/// One static instance is shared between the ISR and the endpoint. Each
/// flag is take-once: consuming it clears it.
#[derive(Debug)]
pub struct DownlinkFlags {
    received: AtomicBool,
    error: AtomicBool,
    timeout: AtomicBool,
}

impl DownlinkFlags {
    /// A cleared flag set, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            received: AtomicBool::new(false),
            error: AtomicBool::new(false),
            timeout: AtomicBool::new(false),
        }
    }

    /// Records a reception outcome. Called from the radio interrupt.
    pub fn post(&self, outcome: ReceptionOutcome) {
        match outcome {
            ReceptionOutcome::Matched => self.received.store(true, Ordering::Release),
            ReceptionOutcome::Mismatched | ReceptionOutcome::CrcError => {
                self.error.store(true, Ordering::Release);
            }
            ReceptionOutcome::Timeout => self.timeout.store(true, Ordering::Release),
        }
    }

    /// Consumes the received flag.
    pub fn take_received(&self) -> bool {
        self.received.swap(false, Ordering::AcqRel)
    }

    /// Consumes the error flag.
    pub fn take_error(&self) -> bool {
        self.error.swap(false, Ordering::AcqRel)
    }

    /// Consumes the timeout flag.
    pub fn take_timeout(&self) -> bool {
        self.timeout.swap(false, Ordering::AcqRel)
    }

    /// Whether any outcome is pending.
    pub fn any_pending(&self) -> bool {
        self.received.load(Ordering::Acquire)
            || self.error.load(Ordering::Acquire)
            || self.timeout.load(Ordering::Acquire)
    }
}

impl Default for DownlinkFlags {
    fn default() -> Self {
        Self::new()
    }
}
