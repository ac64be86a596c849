//! Downlink-triggered association state machine and uplink pipeline.
//!
//! An endpoint idles in a long receive window until a downlink trigger
//! addressed to it arrives, then tracks the querier's schedule: after
//! every trigger (or error, or tolerated miss) it arms the wake timer,
//! sleeps, and reopens a short receive window just before the next
//! trigger is due. Ten consecutive misses drop it back to the long
//! window. Every received trigger also launches one uplink packet in the
//! endpoint's own time slot.

use embedded_hal::delay::DelayNs;

use crate::config::{EndpointConfig, SamplePolicy};
use crate::consts::{
    ASSOC_DISASSOC_THRESH, CODED_MAX_PACKET_SIZE, DL_UL_DELAY_US, MAX_ADVERTISING_DATA_SIZE,
    PAYLOAD_LINK_ID_OFFSET, PAYLOAD_SAMPLE_OFFSET, PAYLOAD_SEQ_OFFSET, RTC_DL_TO_RX_TICKS,
    RTC_TIMEOUT_TO_RX_TICKS, RX_ASSOC_TIMEOUT, RX_DISASSOC_TIMEOUT, UL_PKT_DURATION_US,
    UPSCALED_MAX_WORDS,
};
use crate::error::Error;
use crate::fec;
use crate::logging::{debug, warning};
use crate::packet::{Packet, PhyEncoding};
use crate::pdu::Pdu;
use crate::periph::{BackscatterTransfer, DownlinkFlags, DownlinkRadio, Sensor, WakeTimer};
use crate::upscale;

/// Association state of an endpoint.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum LinkState {
    /// No recent trigger; listening in a long receive window.
    Disassociated,
    /// Tracking the querier's trigger schedule.
    Associated,
}

/// Whether a downlink frame is a trigger addressed to `address`.
///
/// A trigger starts with the fixed bytes `0x02 0x08`, followed by the
/// endpoint's advertising address least significant byte first.
pub fn downlink_matches(frame: &[u8], address: &[u8; 6]) -> bool {
    frame.len() >= 8
        && frame[0] == 0x02
        && frame[1] == 0x08
        && frame[2..8]
            .iter()
            .zip(address.iter().rev())
            .all(|(received, expected)| received == expected)
}

/// One backscatter endpoint: configuration, link state, packet buffers,
/// and the hardware collaborators that move the waveform.
///
/// Created once with [`Endpoint::new`], then driven by calling
/// [`Endpoint::poll`] from the main loop (or [`Endpoint::run`] to loop
/// forever). Reception outcomes arrive through the shared
/// [`DownlinkFlags`], posted by the radio interrupt.
pub struct Endpoint<'a, T, W, R, S, D> {
    config: EndpointConfig,
    state: LinkState,
    state_changed: bool,
    timer_armed: bool,
    fail_count: u8,
    seq: u16,
    payload: [u8; MAX_ADVERTISING_DATA_SIZE],
    packet: Packet,
    coded: [u8; CODED_MAX_PACKET_SIZE],
    upscaled: [u32; UPSCALED_MAX_WORDS],
    upscaled_bytes: usize,
    flags: &'a DownlinkFlags,
    transfer: T,
    timer: W,
    radio: R,
    sensor: Option<S>,
    delay: D,
}

impl<'a, T, W, R, S, D> Endpoint<'a, T, W, R, S, D>
where
    T: BackscatterTransfer,
    W: WakeTimer,
    R: DownlinkRadio,
    S: Sensor,
    D: DelayNs,
{
    /// Builds an endpoint and prepares its first waveform.
    ///
    /// Takes a startup sample if a sensor is present, assembles the
    /// initial packet, upscales it, and points the replay engine at the
    /// waveform so the first trigger only has to refresh the payload.
    ///
    /// # Errors
    /// [`Error::InvalidLength`] for an out-of-range payload length;
    /// [`Error::InvalidChannel`] for a channel above 39;
    /// [`Error::SensorStartup`] if the startup sample fails;
    /// [`Error::PeripheralTransfer`] if the replay engine rejects the
    /// waveform.
    pub fn new(
        config: EndpointConfig,
        flags: &'a DownlinkFlags,
        transfer: T,
        timer: W,
        radio: R,
        mut sensor: Option<S>,
        delay: D,
    ) -> Result<Self, Error> {
        if !config.is_valid() {
            return Err(Error::InvalidLength);
        }

        let mut payload = [0u8; MAX_ADVERTISING_DATA_SIZE];
        if let Some(sensor) = sensor.as_mut() {
            sensor
                .sample(&mut payload[PAYLOAD_SAMPLE_OFFSET..config.payload_len])
                .map_err(|_| Error::SensorStartup)?;
        }
        payload[PAYLOAD_LINK_ID_OFFSET] = config.link_id;

        let pdu = Pdu::build_legacy_adv(&config.address, &payload[..config.payload_len])?;
        let packet = Packet::init(config.channel, &pdu, config.encoding)?;

        let mut endpoint = Self {
            config,
            state: LinkState::Disassociated,
            state_changed: true,
            timer_armed: false,
            fail_count: 0,
            seq: 0,
            payload,
            packet,
            coded: [0u8; CODED_MAX_PACKET_SIZE],
            upscaled: [0u32; UPSCALED_MAX_WORDS],
            upscaled_bytes: 0,
            flags,
            transfer,
            timer,
            radio,
            sensor,
            delay,
        };
        endpoint.upscale_current_packet();
        endpoint
            .transfer
            .configure(
                &endpoint.upscaled[..endpoint.upscaled_bytes / 4],
                endpoint.upscaled_bytes,
            )
            .map_err(|_| Error::PeripheralTransfer)?;
        Ok(endpoint)
    }

    /// Current association state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Uplink payload bytes as they will next be transmitted.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.config.payload_len]
    }

    /// Sequence number of the next uplink packet.
    pub fn sequence(&self) -> u16 {
        self.seq
    }

    /// Runs one step of the association state machine.
    ///
    /// Consumes any pending reception flags, transmits an uplink when a
    /// trigger matched, and reopens the next receive window. Blocks on
    /// the wake timer while associated; callers wanting to interleave
    /// other work do it between polls.
    ///
    /// # Errors
    /// [`Error::PeripheralTransfer`] if the uplink replay fails. The
    /// link state is already advanced at that point, so the caller can
    /// simply poll again.
    pub fn poll(&mut self) -> Result<(), Error> {
        match self.state {
            LinkState::Disassociated => {
                if self.state_changed {
                    self.state_changed = false;
                    self.radio
                        .receive(self.config.downlink_channel, RX_DISASSOC_TIMEOUT);
                }

                if self.flags.take_received() {
                    self.timer.arm(RTC_DL_TO_RX_TICKS);
                    self.timer_armed = true;
                    self.state = LinkState::Associated;
                    debug!("link {} associated", self.config.link_id);
                    self.send_uplink()?;
                } else if self.flags.take_timeout() | self.flags.take_error() {
                    self.radio
                        .receive(self.config.downlink_channel, RX_DISASSOC_TIMEOUT);
                }
            }
            LinkState::Associated => {
                if self.flags.take_received() {
                    self.timer.arm(RTC_DL_TO_RX_TICKS);
                    self.timer_armed = true;
                    self.fail_count = 0;
                    self.send_uplink()?;
                } else if self.flags.take_error() {
                    // Something else was on the air in our window. Keep
                    // the schedule, skip the uplink.
                    self.timer.arm(RTC_DL_TO_RX_TICKS);
                    self.timer_armed = true;
                } else if self.flags.take_timeout() {
                    if self.fail_count >= ASSOC_DISASSOC_THRESH {
                        self.fail_count = 0;
                        self.state_changed = true;
                        self.state = LinkState::Disassociated;
                        debug!("link {} disassociated", self.config.link_id);
                    } else {
                        self.timer.arm(RTC_TIMEOUT_TO_RX_TICKS);
                        self.timer_armed = true;
                        self.fail_count += 1;
                    }
                }

                if self.timer_armed {
                    self.timer_armed = false;
                    let _ = nb::block!(self.timer.wait_expired());
                    self.timer.disarm();
                    self.radio
                        .receive(self.config.downlink_channel, RX_ASSOC_TIMEOUT);
                }
            }
        }
        Ok(())
    }

    /// Polls forever. Uplink failures are logged and the schedule keeps
    /// running.
    pub fn run(&mut self) -> ! {
        loop {
            if self.poll().is_err() {
                warning!("link {} uplink transfer failed", self.config.link_id);
            }
        }
    }

    /// Refreshes the payload, rebuilds the waveform, waits out the
    /// endpoint's time slot, and replays it.
    fn send_uplink(&mut self) -> Result<(), Error> {
        self.payload[PAYLOAD_LINK_ID_OFFSET] = self.config.link_id;
        self.payload[PAYLOAD_SEQ_OFFSET] = self.seq as u8;
        self.payload[PAYLOAD_SEQ_OFFSET + 1] = (self.seq >> 8) as u8;
        self.seq = self.seq.wrapping_add(1);

        if let Some(sensor) = self.sensor.as_mut() {
            let sample = &mut self.payload[PAYLOAD_SAMPLE_OFFSET..self.config.payload_len];
            if sensor.sample(sample).is_err() {
                match self.config.sample_policy {
                    SamplePolicy::ReuseStale => {
                        warning!("link {} sample failed, sending stale data", self.config.link_id);
                    }
                    SamplePolicy::ZeroFill => sample.fill(0),
                }
            }
        }

        let pdu = Pdu::build_legacy_adv(&self.config.address, &self.payload[..self.config.payload_len])?;
        self.packet.update(&pdu)?;
        self.upscale_current_packet();

        // The querier needs turnaround time after its trigger, and each
        // endpoint owns one packet-duration slot ordered by link id.
        self.delay.delay_us(
            DL_UL_DELAY_US + u32::from(self.config.link_id) * UL_PKT_DURATION_US,
        );

        self.transfer
            .configure(&self.upscaled[..self.upscaled_bytes / 4], self.upscaled_bytes)
            .map_err(|_| Error::PeripheralTransfer)?;
        self.transfer.start().map_err(|_| Error::PeripheralTransfer)?;
        nb::block!(self.transfer.wait_complete()).map_err(|_| Error::PeripheralTransfer)?;
        self.transfer.teardown();
        Ok(())
    }

    fn upscale_current_packet(&mut self) {
        self.upscaled_bytes = match self.packet.encoding() {
            PhyEncoding::Uncoded2M => upscale::upscale_2mbps(&mut self.upscaled, self.packet.frame()),
            PhyEncoding::Uncoded1M => upscale::upscale_1mbps(
                &mut self.upscaled,
                self.packet.frame(),
                self.config.carrier_offset,
            ),
            PhyEncoding::CodedS2 | PhyEncoding::CodedS8 => {
                let coded_len = fec::encode_packet(&self.packet, &mut self.coded);
                upscale::upscale_1mbps(
                    &mut self.upscaled,
                    &self.coded[..coded_len],
                    self.config.carrier_offset,
                )
            }
        };
    }
}

impl<T, W, R, S, D> core::fmt::Debug for Endpoint<'_, T, W, R, S, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Endpoint")
            .field("state", &self.state)
            .field("fail_count", &self.fail_count)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}
