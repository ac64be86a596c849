//! Interrupt-side glue for a globally shared endpoint.
//!
//! Embedded firmware keeps the endpoint in a `static` so both `main`
//! and interrupt handlers can reach it. These helpers wrap the usual
//! `critical_section` cell dance, plus the radio-interrupt side of the
//! downlink flags.

use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::config::EndpointConfig;
use crate::error::Error;
use crate::link::{Endpoint, downlink_matches};
use crate::periph::{
    BackscatterTransfer, DownlinkFlags, DownlinkRadio, ReceptionOutcome, Sensor, WakeTimer,
};

/// The globally shared endpoint cell.
pub type GlobalEndpoint<T, W, R, S, D> = Mutex<RefCell<Option<Endpoint<'static, T, W, R, S, D>>>>;

/// Initializes the global static [`Endpoint`] cell.
///
/// # Example
/// ```rust,ignore
/// static FLAGS: DownlinkFlags = DownlinkFlags::new();
/// static ENDPOINT: GlobalEndpoint<Spi, Rtc, Radio, Imu, Delay> =
///     global_endpoint_init::<Spi, Rtc, Radio, Imu, Delay>();
/// ```
pub const fn global_endpoint_init<T, W, R, S, D>() -> GlobalEndpoint<T, W, R, S, D> {
    Mutex::new(RefCell::new(None))
}

/// Builds the endpoint and stores it in the global cell.
///
/// # Errors
/// Whatever [`Endpoint::new`] returns; on error the cell stays empty.
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_endpoint_setup(
///         &ENDPOINT, config, &FLAGS, spi, rtc, radio, Some(imu), delay,
///     ).unwrap();
/// }
/// ```
pub fn global_endpoint_setup<T, W, R, S, D>(
    global: &'static GlobalEndpoint<T, W, R, S, D>,
    config: EndpointConfig,
    flags: &'static DownlinkFlags,
    transfer: T,
    timer: W,
    radio: R,
    sensor: Option<S>,
    delay: D,
) -> Result<(), Error>
where
    T: BackscatterTransfer,
    W: WakeTimer,
    R: DownlinkRadio,
    S: Sensor,
    D: DelayNs,
{
    let endpoint = Endpoint::new(config, flags, transfer, timer, radio, sensor, delay)?;
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(endpoint));
    });
    Ok(())
}

/// Runs one state-machine step on the global endpoint.
///
/// [`Endpoint::poll`] blocks on the wake timer and the transfer
/// completion, so it must not run with interrupts masked: the endpoint
/// is moved out of the cell under the critical section, polled with the
/// section released, and moved back afterwards. While a poll is in
/// flight the cell reads `None`; a reentrant caller is a no-op.
///
/// Returns `Ok(())` when the cell has not been set up yet.
///
/// # Errors
/// Whatever [`Endpoint::poll`] returns.
///
/// # Example
/// ```rust,ignore
/// loop {
///     global_endpoint_poll(&ENDPOINT).unwrap();
/// }
/// ```
pub fn global_endpoint_poll<T, W, R, S, D>(
    global: &'static GlobalEndpoint<T, W, R, S, D>,
) -> Result<(), Error>
where
    T: BackscatterTransfer,
    W: WakeTimer,
    R: DownlinkRadio,
    S: Sensor,
    D: DelayNs,
{
    let endpoint = critical_section::with(|cs| global.borrow(cs).take());
    if let Some(mut endpoint) = endpoint {
        let result = endpoint.poll();
        critical_section::with(|cs| {
            let _ = global.borrow(cs).replace(Some(endpoint));
        });
        result
    } else {
        Ok(())
    }
}

/// Classifies a closed receive window and posts its outcome.
///
/// Call from the radio interrupt when a window ends: `frame` is the
/// received frame if one arrived, `crc_ok` is the radio's CRC verdict
/// for it, and `address` is this endpoint's advertising address.
///
/// # Example
/// ```rust,ignore
/// fn radio_rx_done(status: RxStatus) {
///     post_reception(&FLAGS, status.frame(), status.crc_ok(), &ADDRESS);
/// }
/// ```
pub fn post_reception(
    flags: &DownlinkFlags,
    frame: Option<&[u8]>,
    crc_ok: bool,
    address: &[u8; 6],
) {
    let outcome = match frame {
        None => ReceptionOutcome::Timeout,
        Some(_) if !crc_ok => ReceptionOutcome::CrcError,
        Some(frame) if downlink_matches(frame, address) => ReceptionOutcome::Matched,
        Some(_) => ReceptionOutcome::Mismatched,
    };
    flags.post(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicBool, Ordering};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    const ADDRESS: [u8; 6] = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc];

    struct ProbeTransfer;

    impl BackscatterTransfer for ProbeTransfer {
        type Error = Infallible;

        fn configure(&mut self, _waveform: &[u32], _len_bytes: usize) -> Result<(), Infallible> {
            Ok(())
        }

        fn start(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn poll_complete(&mut self) -> bool {
            true
        }

        fn teardown(&mut self) {}
    }

    struct ProbeTimer;

    impl WakeTimer for ProbeTimer {
        fn arm(&mut self, _ticks: u32) {}

        fn disarm(&mut self) {}

        fn poll_expired(&mut self) -> bool {
            // An ISR-fed timer flag is only observable if the blocking
            // wait runs with the cell released and interrupts live.
            let empty = critical_section::with(|cs| GLOBAL.borrow(cs).borrow().is_none());
            CELL_RELEASED_DURING_POLL.store(empty, Ordering::Relaxed);
            true
        }
    }

    struct ProbeRadio;

    impl DownlinkRadio for ProbeRadio {
        fn receive(&mut self, _channel: u8, _timeout: u32) {}
    }

    enum ProbeSensor {}

    impl Sensor for ProbeSensor {
        type Error = Infallible;

        fn sample(&mut self, _out: &mut [u8]) -> Result<(), Infallible> {
            match *self {}
        }
    }

    static FLAGS: DownlinkFlags = DownlinkFlags::new();
    static GLOBAL: GlobalEndpoint<ProbeTransfer, ProbeTimer, ProbeRadio, ProbeSensor, NoopDelay> =
        global_endpoint_init();
    static CELL_RELEASED_DURING_POLL: AtomicBool = AtomicBool::new(false);

    #[test]
    fn test_poll_releases_the_cell_while_blocking() {
        global_endpoint_setup(
            &GLOBAL,
            EndpointConfig::default(),
            &FLAGS,
            ProbeTransfer,
            ProbeTimer,
            ProbeRadio,
            None,
            NoopDelay,
        )
        .unwrap();

        // Open the long window, associate on a trigger, then reach the
        // wake-timer wait on the following poll.
        global_endpoint_poll(&GLOBAL).unwrap();
        FLAGS.post(ReceptionOutcome::Matched);
        global_endpoint_poll(&GLOBAL).unwrap();
        global_endpoint_poll(&GLOBAL).unwrap();

        assert!(CELL_RELEASED_DURING_POLL.load(Ordering::Relaxed));
        // The endpoint is back in the cell after every poll.
        assert!(critical_section::with(|cs| GLOBAL.borrow(cs).borrow().is_some()));
    }

    #[test]
    fn test_post_reception_classification() {
        let flags = DownlinkFlags::new();

        post_reception(&flags, None, false, &ADDRESS);
        assert!(flags.take_timeout());

        let trigger = [0x02, 0x08, 0xbc, 0x9a, 0x78, 0x56, 0x34, 0x12];
        post_reception(&flags, Some(&trigger), true, &ADDRESS);
        assert!(flags.take_received());

        // A corrupted frame never counts as a match, even if the bytes
        // happen to line up.
        post_reception(&flags, Some(&trigger), false, &ADDRESS);
        assert!(!flags.take_received());
        assert!(flags.take_error());

        let other = [0x02, 0x08, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        post_reception(&flags, Some(&other), true, &ADDRESS);
        assert!(flags.take_error());
    }
}
