//! Transport traits for connection-oriented byte streams.
//!
//! These traits describe the minimal, non-blocking surface a stream
//! transport (a TCP socket, a radio link, a USB CDC endpoint) has to offer
//! so that [`StreamIo`](crate::io::stream::StreamIo) can run a command line
//! session over it.
//!
//! A transport signals "no data yet" or "buffer full" by returning an error
//! whose [`TransportError::is_would_block`] is `true`. Every other error,
//! and a read that returns `Ok(0)`, means the peer is gone.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Host TCP transport over `std::net`
#[cfg(feature = "std")]
pub mod tcp;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Bind, Close, Connection, Read, TransportError, Write};
}

/// Classification of transport errors.
pub trait TransportError: core::fmt::Debug {
    /// `true` when the operation could not make progress right now but the
    /// connection is still healthy.
    fn is_would_block(&self) -> bool;
}

// Core synchronous traits
pub trait Read {
    /// Associated error type
    type Error: TransportError;
    /// Read data from the connection without blocking
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: TransportError;
    /// Write data to the connection without blocking
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous binder (server)
pub trait Bind {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Bind to a local address and wait for one incoming connection
    fn bind(&mut self, local: &str) -> Result<Self::Connection, Self::Error>;
}
