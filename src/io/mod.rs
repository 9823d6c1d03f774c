//! Byte-level I/O capability used by the command line engine.
//!
//! The engine never talks to a UART or a socket directly. It talks to a
//! [`CliIo`] implementation, which only has to provide three primitives:
//!
//! - [`put_byte`](CliIo::put_byte): send one byte
//! - [`get_byte`](CliIo::get_byte): take one byte, or `None` if nothing is ready
//! - [`byte_available`](CliIo::byte_available): non-blocking readiness check
//!
//! Everything else (bulk transfer, printing, prompt and erase sequences,
//! screen clear) has a default expressed in terms of those primitives.
//! Packet transports should override [`put_bytes`](CliIo::put_bytes) and
//! [`get_bytes`](CliIo::get_bytes) for throughput, and to run a
//! [`FramingFilter`](telnet::FramingFilter) over inbound data.
//!
//! # Adapters
//!
//! - [`serial::SerialIo`]: plain UART over `embedded-io`, no framing
//! - [`stream::StreamIo`]: any [`network`](crate::network) connection, with
//!   an optional telnet framing filter
//!
//! # Example
//!
//! ```rust
//! use libcli::io::CliIo;
//!
//! struct Loopback {
//!     out: heapless::Vec<u8, 64>,
//! }
//!
//! impl CliIo for Loopback {
//!     fn put_byte(&mut self, byte: u8) {
//!         let _ = self.out.push(byte);
//!     }
//!     fn get_byte(&mut self) -> Option<u8> {
//!         None
//!     }
//!     fn byte_available(&mut self) -> bool {
//!         false
//!     }
//! }
//!
//! let mut io = Loopback { out: heapless::Vec::new() };
//! io.printf(format_args!("{} + {} = {}", 1, 2, 1 + 2));
//! assert_eq!(&io.out[..], b"1 + 2 = 3");
//! ```

use core::fmt;

/// Plain UART adapter.
pub mod serial;

/// Adapter for connection-oriented stream transports.
pub mod stream;

/// Transport framing filters (telnet control sequence handling).
pub mod telnet;

/// Byte sink and source the engine runs on.
///
/// All methods must return promptly. `get_byte` and `get_bytes` report "no
/// data" instead of waiting for it.
pub trait CliIo {
    /// Send one byte.
    fn put_byte(&mut self, byte: u8);

    /// Take one byte if one is ready.
    fn get_byte(&mut self) -> Option<u8>;

    /// Whether at least one byte can be read without blocking.
    fn byte_available(&mut self) -> bool;

    /// Send a buffer. Defaults to one [`put_byte`](Self::put_byte) per byte.
    fn put_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.put_byte(byte);
        }
    }

    /// Fill `buffer` with whatever is ready and return the count.
    ///
    /// Returning fewer bytes than `buffer.len()`, including zero, is normal.
    fn get_bytes(&mut self, buffer: &mut [u8]) -> usize {
        let mut count = 0;
        while count < buffer.len() && self.byte_available() {
            match self.get_byte() {
                Some(byte) => {
                    buffer[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Whether the underlying transport is still usable.
    ///
    /// The engine stops emitting and consuming bytes while this is `false`.
    fn is_connected(&self) -> bool {
        true
    }

    /// Send a string.
    fn print(&mut self, text: &str) {
        if !text.is_empty() {
            self.put_bytes(text.as_bytes());
        }
    }

    /// Send a line break (`"\r\n"`).
    fn println(&mut self) {
        self.print("\r\n");
    }

    /// Send a string followed by a line break.
    fn print_line(&mut self, text: &str) {
        self.print(text);
        self.println();
    }

    /// Send formatted text.
    ///
    /// Output is streamed through [`put_bytes`](Self::put_bytes) piece by
    /// piece, so there is no intermediate buffer and nothing is truncated.
    fn printf(&mut self, args: fmt::Arguments<'_>) {
        let mut sink = FmtSink { io: self };
        let _ = fmt::write(&mut sink, args);
    }

    /// Push buffered output to the transport. No-op by default.
    fn flush(&mut self) {}

    /// Clear the remote terminal.
    fn clear_screen(&mut self) {
        self.print("\x1b[2J\r\n");
    }

    /// Show the prompt.
    fn send_prompt(&mut self, prompt: &str) {
        self.print(prompt);
    }

    /// Erase the character left of the cursor on the remote terminal.
    fn send_backspace(&mut self) {
        self.print("\x08 \x08");
    }
}

/// Adapts a [`CliIo`] to [`core::fmt::Write`].
struct FmtSink<'a, IO: CliIo + ?Sized> {
    io: &'a mut IO,
}

impl<IO: CliIo + ?Sized> fmt::Write for FmtSink<'_, IO> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.io.print(s);
        Ok(())
    }
}

impl<T: CliIo + ?Sized> CliIo for &mut T {
    fn put_byte(&mut self, byte: u8) {
        (**self).put_byte(byte)
    }

    fn get_byte(&mut self) -> Option<u8> {
        (**self).get_byte()
    }

    fn byte_available(&mut self) -> bool {
        (**self).byte_available()
    }

    fn put_bytes(&mut self, data: &[u8]) {
        (**self).put_bytes(data)
    }

    fn get_bytes(&mut self, buffer: &mut [u8]) -> usize {
        (**self).get_bytes(buffer)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn print(&mut self, text: &str) {
        (**self).print(text)
    }

    fn println(&mut self) {
        (**self).println()
    }

    fn print_line(&mut self, text: &str) {
        (**self).print_line(text)
    }

    fn printf(&mut self, args: fmt::Arguments<'_>) {
        (**self).printf(args)
    }

    fn flush(&mut self) {
        (**self).flush()
    }

    fn clear_screen(&mut self) {
        (**self).clear_screen()
    }

    fn send_prompt(&mut self, prompt: &str) {
        (**self).send_prompt(prompt)
    }

    fn send_backspace(&mut self) {
        (**self).send_backspace()
    }
}
