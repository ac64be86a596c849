//! Wakeup timing in RTC ticks.
//!
//! The wake timer counts a 16384 Hz RTC clock, so one tick is roughly
//! 61.035 microseconds. The two scheduling constants in
//! [`crate::consts`] are precomputed with these conversions: 393 ticks
//! from a received trigger to the next receive window, 373 from a
//! timed-out window (the shorter gap compensates for the window's own
//! wakeup lead time).

/// RTC clock frequency in Hz.
pub const RTC_FREQ_HZ: u32 = 16_384;

/// One RTC tick in microseconds.
pub const RTC_TICK_US: f64 = 1_000_000.0 / RTC_FREQ_HZ as f64;

/// Converts a duration in microseconds to the nearest RTC tick count.
pub fn rtc_ticks(duration_us: u32) -> u32 {
    libm::round(f64::from(duration_us) / RTC_TICK_US) as u32
}

/// Const variant of [`rtc_ticks`] using integer rounding.
pub const fn const_rtc_ticks(duration_us: u32) -> u32 {
    ((duration_us as u64 * RTC_FREQ_HZ as u64 + 500_000) / 1_000_000) as u32
}
