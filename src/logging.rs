//! Internal logging shim.
//!
//! Routes to `log` or `defmt` depending on which feature is enabled,
//! with `log` taking precedence when both are. Without either feature
//! the macros compile to nothing. Call sites stick to primitive format
//! arguments so the same format strings work under both backends.

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(all(feature = "defmt-0-3", not(feature = "log")))]
macro_rules! debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! warning {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(all(feature = "defmt-0-3", not(feature = "log")))]
macro_rules! warning {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
macro_rules! warning {
    ($($arg:tt)*) => {{}};
}

pub(crate) use debug;
pub(crate) use warning;
