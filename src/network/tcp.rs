//! Host TCP transport.
//!
//! Implements the crate's transport traits for [`std::net::TcpStream`] and
//! provides [`TcpServer`], a single-client listener. Useful for running a
//! session over telnet on a development machine or an embedded Linux board.

use std::io::{self, ErrorKind};
use std::net::{Shutdown, TcpListener, TcpStream};

use super::error::Error;
use super::{Bind, Close, Connection, Read, Write};

fn map_io_error(err: &io::Error, fallback: Error) -> Error {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::Interrupted => Error::WouldBlock,
        ErrorKind::ConnectionRefused => Error::ConnectionRefused,
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::UnexpectedEof => Error::ConnectionClosed,
        ErrorKind::NotConnected => Error::NotOpen,
        ErrorKind::AddrInUse | ErrorKind::AddrNotAvailable | ErrorKind::InvalidInput => {
            Error::InvalidAddress
        }
        _ => fallback,
    }
}

impl Read for TcpStream {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        io::Read::read(self, buf).map_err(|e| map_io_error(&e, Error::ReadError))
    }
}

impl Write for TcpStream {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        io::Write::write(self, buf).map_err(|e| map_io_error(&e, Error::WriteError))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        io::Write::flush(self).map_err(|e| map_io_error(&e, Error::WriteError))
    }
}

impl Close for TcpStream {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer already hung up.
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(map_io_error(&e, Error::ConnectionClosed)),
        }
    }
}

impl Connection for TcpStream {}

/// Accepts exactly one TCP client per [`bind`](Bind::bind) call.
///
/// The listening socket is dropped as soon as a client is accepted, so a
/// second client trying to connect while a session is active is refused by
/// the operating system. The accepted stream is switched to non-blocking
/// mode with `TCP_NODELAY` set, which is what the session driver expects.
///
/// `bind` itself blocks until a client arrives; call it from the
/// reconnection path of the polling loop, not from the loop body.
#[derive(Debug, Default)]
pub struct TcpServer {
    accepted: usize,
}

impl TcpServer {
    /// Create a new server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clients accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl Bind for TcpServer {
    type Connection = TcpStream;
    type Error = Error;

    fn bind(&mut self, local: &str) -> Result<Self::Connection, Self::Error> {
        let listener =
            TcpListener::bind(local).map_err(|e| map_io_error(&e, Error::InvalidAddress))?;
        info!("tcp: waiting for a client");

        let (stream, _peer) = listener
            .accept()
            .map_err(|e| map_io_error(&e, Error::ConnectionRefused))?;
        drop(listener);

        stream
            .set_nonblocking(true)
            .map_err(|e| map_io_error(&e, Error::NotOpen))?;
        stream
            .set_nodelay(true)
            .map_err(|e| map_io_error(&e, Error::NotOpen))?;

        self.accepted += 1;
        info!("tcp: client connected");
        Ok(stream)
    }
}
