//! Crate-internal logging macros.
//!
//! With the `defmt` feature the macros forward to the matching `defmt`
//! macro. Without it they expand to a borrow of every argument so call
//! sites compile to nothing and produce no unused-variable warnings.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($fmt:tt $(, $arg:expr)* $(,)?) => { ::defmt::trace!($fmt $(, $arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($fmt:tt $(, $arg:expr)* $(,)?) => { ::defmt::debug!($fmt $(, $arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! info {
    ($fmt:tt $(, $arg:expr)* $(,)?) => { ::defmt::info!($fmt $(, $arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($fmt:tt $(, $arg:expr)* $(,)?) => { ::defmt::warn!($fmt $(, $arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($fmt:tt $(, $arg:expr)* $(,)?) => {{ $(let _ = &$arg;)* }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($fmt:tt $(, $arg:expr)* $(,)?) => {{ $(let _ = &$arg;)* }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($fmt:tt $(, $arg:expr)* $(,)?) => {{ $(let _ = &$arg;)* }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($fmt:tt $(, $arg:expr)* $(,)?) => {{ $(let _ = &$arg;)* }};
}
