//! Command line I/O over a UART.
//!
//! Wraps any `embedded-io` serial port that can report read readiness. A
//! UART has no in-band control sequences and no notion of a peer going
//! away, so no framing filter is applied and the adapter is always
//! connected. Write errors are logged and dropped.

use embedded_io::{Read, ReadReady, Write};

use super::CliIo;

/// [`CliIo`] adapter over an `embedded-io` serial port.
#[derive(Debug)]
pub struct SerialIo<U> {
    uart: U,
}

impl<U> SerialIo<U> {
    /// Wrap an already configured serial port.
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Give the serial port back.
    pub fn release(self) -> U {
        self.uart
    }

    /// The wrapped serial port.
    pub fn inner(&self) -> &U {
        &self.uart
    }

    /// The wrapped serial port.
    pub fn inner_mut(&mut self) -> &mut U {
        &mut self.uart
    }
}

impl<U> CliIo for SerialIo<U>
where
    U: Read + ReadReady + Write,
{
    fn put_byte(&mut self, byte: u8) {
        self.put_bytes(&[byte]);
    }

    fn get_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.get_bytes(&mut byte) {
            1 => Some(byte[0]),
            _ => None,
        }
    }

    fn byte_available(&mut self) -> bool {
        self.uart.read_ready().unwrap_or(false)
    }

    fn put_bytes(&mut self, data: &[u8]) {
        if self.uart.write_all(data).is_err() {
            warn!("serial: dropped {} bytes of output", data.len());
        }
    }

    fn get_bytes(&mut self, buffer: &mut [u8]) -> usize {
        // `read` blocks until at least one byte arrives; only call it when
        // the driver already holds data.
        if buffer.is_empty() || !self.byte_available() {
            return 0;
        }
        match self.uart.read(buffer) {
            Ok(n) => n,
            Err(_) => {
                warn!("serial: read error");
                0
            }
        }
    }

    fn flush(&mut self) {
        if self.uart.flush().is_err() {
            warn!("serial: flush failed");
        }
    }
}
