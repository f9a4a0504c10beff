//! Optional logging
//!
//! `debug!`, `warn!` and `error!` forward to `log` (feature `log`, enabled by
//! `std`) and/or `defmt` (feature `defmt`, enabled by `embedded`). With
//! neither feature they expand to nothing but still borrow their arguments,
//! so call sites compile warning-free in every configuration.
//!
//! Format strings must stay within the syntax both backends accept: plain
//! `{}` placeholders, no width or precision.

macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::debug!($fmt $(, $arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::debug!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::warn!($fmt $(, $arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::error!($fmt $(, $arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::error!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt")))]
        let _ = ($(&$arg,)*);
    }};
}
