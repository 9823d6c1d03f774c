//! Command line I/O over a connection-oriented byte stream.
//!
//! [`StreamIo`] owns at most one live connection (a TCP socket on a WiFi
//! station, a host `TcpStream`, ...) and exposes it as a [`CliIo`]. It
//! tracks the connection state on its own: a read or write error other than
//! would-block, a read of zero bytes (orderly close) or a write that keeps
//! stalling marks the adapter disconnected. From then on every output call
//! is a no-op and every input call reports no data, until a new connection
//! is [`attach`](StreamIo::attach)ed or [`accept`](StreamIo::accept)ed.
//!
//! Inbound data passes through a [`FramingFilter`] before the engine sees
//! it. Use [`Telnet`](super::telnet::Telnet) for telnet clients and
//! [`Raw`] for transports without in-band control bytes.
//!
//! A write the transport cannot take right away is retried. Between two
//! attempts the adapter waits on an `embedded-hal` [`DelayNs`] given to
//! [`StreamIo::with_delay`], so the retry budget is a bounded stall time
//! rather than a burst of back-to-back calls. [`StreamIo::new`] uses
//! [`NoDelay`], which suits transports that never report would-block.
//!
//! # Example
//!
//! ```rust,no_run
//! use libcli::io::stream::StreamIo;
//! use libcli::io::telnet::Telnet;
//! # use libcli::network::{error::Error, Bind, Close, Connection, Read, Write};
//! # struct Socket;
//! # impl Read for Socket {
//! #     type Error = Error;
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Error> { Err(Error::WouldBlock) }
//! # }
//! # impl Write for Socket {
//! #     type Error = Error;
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Error> { Ok(()) }
//! # }
//! # impl Close for Socket {
//! #     type Error = Error;
//! #     fn close(self) -> Result<(), Error> { Ok(()) }
//! # }
//! # impl Connection for Socket {}
//! # struct Server;
//! # impl Bind for Server {
//! #     type Connection = Socket;
//! #     type Error = Error;
//! #     fn bind(&mut self, _local: &str) -> Result<Socket, Error> { Ok(Socket) }
//! # }
//!
//! let mut server = Server;
//! let mut io: StreamIo<Socket, Telnet> = StreamIo::new(Telnet::new());
//! io.accept(&mut server, "0.0.0.0:23").unwrap();
//! assert!(libcli::io::CliIo::is_connected(&io));
//! ```

use embedded_hal::delay::DelayNs;
use heapless::Deque;

use super::CliIo;
use super::telnet::{FramingFilter, Raw};
use crate::cli::READ_CHUNK_SIZE;
use crate::network::{Bind, Close, Connection, Read, TransportError, Write};

/// How many consecutive stalled write attempts are tolerated before the
/// connection is considered dead.
pub const DEFAULT_WRITE_RETRIES: usize = 100;

/// Wait between two stalled write attempts, in microseconds.
///
/// With [`DEFAULT_WRITE_RETRIES`] a peer may stall for about 50 ms before it
/// is dropped.
pub const DEFAULT_RETRY_DELAY_US: u32 = 500;

/// A [`DelayNs`] that returns immediately.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// A [`DelayNs`] that parks the calling thread.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns.into()));
    }
}

/// Why bytes could not be delivered to the peer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError<E> {
    /// No connection is attached.
    NotConnected,
    /// The transport kept refusing data past the retry budget.
    Stalled,
    /// The transport reported a hard error.
    Transport(E),
}

/// Failure of [`StreamIo::accept`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcceptError<B, E> {
    /// No client could be accepted.
    Bind(B),
    /// A client was accepted but the framing handshake could not be sent.
    Handshake(StreamError<E>),
}

/// Retry policy for writes the transport does not take at once.
#[derive(Debug)]
struct Backoff<D> {
    delay: D,
    retries: usize,
    delay_us: u32,
}

impl<D: DelayNs> Backoff<D> {
    /// Write all of `data`, waiting between stalled attempts.
    fn send_all<T: Write>(
        &mut self,
        conn: &mut T,
        data: &[u8],
    ) -> Result<(), StreamError<T::Error>> {
        let mut sent = 0;
        let mut stalls = 0;

        while sent < data.len() {
            match conn.write(&data[sent..]) {
                Ok(0) => stalls += 1,
                Ok(n) => {
                    sent += n;
                    stalls = 0;
                    continue;
                }
                Err(e) if e.is_would_block() => stalls += 1,
                Err(e) => return Err(StreamError::Transport(e)),
            }
            if stalls > self.retries {
                return Err(StreamError::Stalled);
            }
            self.delay.delay_us(self.delay_us);
        }

        Ok(())
    }
}

/// [`CliIo`] adapter over a stream connection.
pub struct StreamIo<T, F = Raw, D = NoDelay> {
    connection: Option<T>,
    filter: F,
    connected: bool,
    lookahead: Deque<u8, READ_CHUNK_SIZE>,
    backoff: Backoff<D>,
}

impl<T, F: core::fmt::Debug, D> core::fmt::Debug for StreamIo<T, F, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamIo")
            .field("connected", &self.connected)
            .field("filter", &self.filter)
            .field("lookahead", &self.lookahead.len())
            .field("write_retries", &self.backoff.retries)
            .field("retry_delay_us", &self.backoff.delay_us)
            .finish_non_exhaustive()
    }
}

impl<T, F: Default, D: Default> Default for StreamIo<T, F, D> {
    fn default() -> Self {
        Self::with_delay(F::default(), D::default())
    }
}

impl<T, F> StreamIo<T, F> {
    /// Create a disconnected adapter using `filter` for inbound data.
    ///
    /// Stalled writes are retried without waiting.
    pub fn new(filter: F) -> Self {
        Self::with_delay(filter, NoDelay)
    }
}

impl<T, F, D> StreamIo<T, F, D> {
    /// Create a disconnected adapter that waits on `delay` between stalled
    /// write attempts.
    pub fn with_delay(filter: F, delay: D) -> Self {
        Self {
            connection: None,
            filter,
            connected: false,
            lookahead: Deque::new(),
            backoff: Backoff {
                delay,
                retries: DEFAULT_WRITE_RETRIES,
                delay_us: DEFAULT_RETRY_DELAY_US,
            },
        }
    }

    /// Set how many consecutive stalled writes are tolerated.
    pub fn set_write_retries(&mut self, retries: usize) {
        self.backoff.retries = retries;
    }

    /// Set the wait between two stalled write attempts.
    pub fn set_retry_delay_us(&mut self, delay_us: u32) {
        self.backoff.delay_us = delay_us;
    }

    /// Hand the connection back to the caller and mark the adapter
    /// disconnected. Unread buffered input is discarded.
    pub fn detach(&mut self) -> Option<T> {
        if self.connection.is_some() {
            info!("stream: connection detached");
        }
        self.connected = false;
        self.lookahead.clear();
        self.connection.take()
    }

    /// The framing filter.
    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// The attached connection, if any.
    pub fn connection(&self) -> Option<&T> {
        self.connection.as_ref()
    }

    /// The attached connection, if any.
    pub fn connection_mut(&mut self) -> Option<&mut T> {
        self.connection.as_mut()
    }

    fn mark_disconnected(&mut self, cause: &str) {
        if self.connected {
            warn!("stream: disconnected ({})", cause);
        }
        self.connected = false;
        self.lookahead.clear();
    }
}

impl<T, F, D> StreamIo<T, F, D>
where
    T: Read + Write,
    F: FramingFilter,
    D: DelayNs,
{
    /// Attach a freshly established connection and send the filter's
    /// handshake once.
    ///
    /// Any previous connection is dropped. When the handshake cannot be
    /// delivered the adapter is left disconnected.
    pub fn attach(&mut self, connection: T) -> Result<(), StreamError<<T as Write>::Error>> {
        self.lookahead.clear();
        self.filter.reset();
        self.connection = Some(connection);
        self.connected = true;
        info!("stream: connection attached");

        let backoff = &mut self.backoff;
        let result = match self.connection.as_mut() {
            Some(conn) => self
                .filter
                .handshake()
                .iter()
                .try_for_each(|sequence| backoff.send_all(&mut *conn, sequence)),
            None => Err(StreamError::NotConnected),
        };

        match result {
            Ok(()) => {
                debug!(
                    "stream: sent {} negotiation sequences",
                    self.filter.handshake().len()
                );
                Ok(())
            }
            Err(e) => {
                self.mark_disconnected("handshake failed");
                Err(e)
            }
        }
    }

    /// Accept one client from `binder` and attach it.
    pub fn accept<B>(
        &mut self,
        binder: &mut B,
        local: &str,
    ) -> Result<(), AcceptError<B::Error, <T as Write>::Error>>
    where
        B: Bind<Connection = T>,
        T: Connection,
    {
        let connection = binder.bind(local).map_err(AcceptError::Bind)?;
        self.attach(connection).map_err(AcceptError::Handshake)
    }

    fn read_filtered(&mut self, buffer: &mut [u8]) -> usize {
        if !self.connected || buffer.is_empty() {
            return 0;
        }
        let Some(conn) = self.connection.as_mut() else {
            return 0;
        };

        match conn.read(buffer) {
            Ok(0) => {
                self.mark_disconnected("closed by peer");
                0
            }
            Ok(n) => self.filter.filter_inbound(&mut buffer[..n]),
            Err(e) if e.is_would_block() => 0,
            Err(_) => {
                self.mark_disconnected("read error");
                0
            }
        }
    }

    fn fill_lookahead(&mut self) {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let room = READ_CHUNK_SIZE - self.lookahead.len();
        let len = self.read_filtered(&mut chunk[..room]);
        for &byte in &chunk[..len] {
            // Cannot overflow: at most `room` bytes were read.
            let _ = self.lookahead.push_back(byte);
        }
    }
}

impl<T, F, D> StreamIo<T, F, D>
where
    T: Read + Write + Close,
{
    /// Close the attached connection, if any.
    pub fn close(&mut self) -> Result<(), <T as Close>::Error> {
        match self.detach() {
            Some(conn) => conn.close(),
            None => Ok(()),
        }
    }
}

impl<T, F, D> CliIo for StreamIo<T, F, D>
where
    T: Read + Write,
    F: FramingFilter,
    D: DelayNs,
{
    fn put_byte(&mut self, byte: u8) {
        self.put_bytes(&[byte]);
    }

    fn get_byte(&mut self) -> Option<u8> {
        if self.byte_available() {
            self.lookahead.pop_front()
        } else {
            None
        }
    }

    fn byte_available(&mut self) -> bool {
        if self.lookahead.is_empty() {
            self.fill_lookahead();
        }
        !self.lookahead.is_empty()
    }

    fn put_bytes(&mut self, data: &[u8]) {
        if !self.connected || data.is_empty() {
            return;
        }
        let result = match self.connection.as_mut() {
            Some(conn) => self.backoff.send_all(conn, data),
            None => Err(StreamError::NotConnected),
        };
        match result {
            Ok(()) => {}
            Err(StreamError::Stalled) => self.mark_disconnected("write stalled"),
            Err(_) => self.mark_disconnected("write error"),
        }
    }

    fn get_bytes(&mut self, buffer: &mut [u8]) -> usize {
        if self.lookahead.is_empty() {
            return self.read_filtered(buffer);
        }

        let mut count = 0;
        while count < buffer.len() {
            match self.lookahead.pop_front() {
                Some(byte) => {
                    buffer[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn flush(&mut self) {
        if !self.connected {
            return;
        }
        let result = match self.connection.as_mut() {
            Some(conn) => conn.flush(),
            None => return,
        };
        if let Err(e) = result {
            if !e.is_would_block() {
                self.mark_disconnected("flush error");
            }
        }
    }
}
