//! # blebsc
//!
//! A portable, no_std Rust stack for BLE backscatter endpoints: passive
//! tags that transmit Bluetooth Low Energy advertising packets by
//! modulating a reflected carrier instead of running their own radio.
//!
//! This crate implements:
//! - the full legacy advertising packet codec: ADV_NONCONN_IND PDU
//!   construction, CRC-24, and per-channel whitening, all bit-reversed
//!   for least-significant-bit-first air order
//! - the LE Coded PHY forward error correction encoder (S=8 and S=2)
//! - OOK waveform upscaling with selectable sideband carrier offsets,
//!   producing the 32-bit word stream a SPI/DMA shift register replays
//!   through the backscatter switch
//! - a downlink-triggered association state machine that slot-schedules
//!   uplinks behind a querier's trigger packets
//!
//! ## Crate features
//! | Feature     | Description |
//! |-------------|-------------|
//! | `std`       | Disables `#![no_std]` support |
//! | `isr` (default) | Global-endpoint helpers built on `critical-section` |
//! | `defmt-0-3` | Uses `defmt` logging |
//! | `log`       | Uses `log` logging |
//!
//! ## Usage
//!
//! The codec layers work standalone:
//!
//! ```rust
//! use blebsc::packet::{Packet, PhyEncoding};
//! use blebsc::pdu::Pdu;
//!
//! let address = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc];
//! let payload = [0u8; 24];
//! let pdu = Pdu::build_legacy_adv(&address, &payload).unwrap();
//! let packet = Packet::init(37, &pdu, PhyEncoding::Uncoded1M).unwrap();
//! assert_eq!(packet.len(), 1 + 4 + 32 + 3);
//! ```
//!
//! A full endpoint wires the codec to hardware through the traits in
//! [`periph`]:
//!
//! ```rust,ignore
//! use blebsc::config::EndpointConfig;
//! use blebsc::link::Endpoint;
//! use blebsc::periph::DownlinkFlags;
//!
//! static FLAGS: DownlinkFlags = DownlinkFlags::new();
//!
//! let mut endpoint = Endpoint::new(
//!     EndpointConfig::default(),
//!     &FLAGS,
//!     spi_dma,
//!     rtc,
//!     radio,
//!     Some(imu),
//!     delay,
//! )?;
//! endpoint.run();
//! ```
//!
//! ## Integration Notes
//!
//! - The radio interrupt reports window outcomes through
//!   [`periph::DownlinkFlags`]; [`isr::post_reception`] does the
//!   classification.
//! - Waveform buffers are sized for the worst case (a 31-byte payload
//!   at S=8) so a single allocation serves every encoding.
//! - Only one endpoint instance should drive the modulator at a time.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "isr")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod bits;
pub mod config;
pub mod consts;
pub mod crc;
pub mod error;
pub mod fec;
#[cfg(feature = "isr")]
pub mod isr;
pub mod link;
pub(crate) mod logging;
pub mod packet;
pub mod pdu;
pub mod periph;
pub mod timing;
pub mod upscale;
pub mod whitening;
