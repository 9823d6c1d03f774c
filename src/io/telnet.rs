//! Telnet framing filter.
//!
//! Telnet multiplexes control sequences and user data on the same byte
//! stream. Every control sequence starts with the IAC byte (`0xFF`) and is
//! treated here as exactly three bytes long (`IAC <verb> <option>`), which
//! covers the WILL/WONT/DO/DONT negotiation a terminal client sends right
//! after connecting.
//!
//! IAC stripping is stateless across reads: a sequence cut off by the end
//! of a read is dropped together with its missing tail.
//!
//! In character mode a client sends Enter as `CR NUL` (RFC 854). [`Telnet`]
//! drops the NUL of that pair, also when the CR ended the previous read, so
//! the engine only sees the CR.
//!
//! ```rust
//! use libcli::io::telnet::strip_commands;
//!
//! let mut data = [0x41, 0xFF, 0xFB, 0x01, 0x42];
//! let len = strip_commands(&mut data);
//! assert_eq!(&data[..len], &[0x41, 0x42]);
//! ```

use crate::cli::ASCII_CR;

/// Interpret As Command.
pub const IAC: u8 = 0xFF;
/// Sender wants to enable an option.
pub const WILL: u8 = 0xFB;
/// Sender refuses or disables an option.
pub const WONT: u8 = 0xFC;
/// Sender asks the receiver to enable an option.
pub const DO: u8 = 0xFD;
/// Sender asks the receiver to disable an option.
pub const DONT: u8 = 0xFE;

/// Echo option (RFC 857).
pub const OPT_ECHO: u8 = 0x01;
/// Suppress Go Ahead option (RFC 858).
pub const OPT_SUPPRESS_GO_AHEAD: u8 = 0x03;
/// Linemode option (RFC 1184).
pub const OPT_LINEMODE: u8 = 0x22;

/// Padding byte a client sends after a bare CR.
pub const NUL: u8 = 0x00;

/// Length of every control sequence the filter removes.
pub const SEQUENCE_LEN: usize = 3;

/// Negotiation sent on connect by [`Telnet::new`].
///
/// The server announces it will echo and suppress go-ahead, which puts
/// common clients into character-at-a-time mode with local echo off. The
/// engine does its own echo, so nothing breaks if the peer ignores this.
pub const DEFAULT_NEGOTIATION: &[[u8; SEQUENCE_LEN]] = &[
    [IAC, WILL, OPT_ECHO],
    [IAC, WILL, OPT_SUPPRESS_GO_AHEAD],
];

/// Inbound/outbound transformation applied by a transport adapter.
pub trait FramingFilter {
    /// Remove transport control bytes from `data` in place and return the
    /// length of the remaining payload, compacted at the front of `data`.
    fn filter_inbound(&mut self, data: &mut [u8]) -> usize;

    /// Sequences to send once, right after the connection is established.
    fn handshake(&self) -> &[[u8; SEQUENCE_LEN]] {
        &[]
    }

    /// Forget state carried over from the previous connection.
    fn reset(&mut self) {}
}

/// No framing. Every byte is data.
#[derive(Debug, Default, Clone, Copy)]
pub struct Raw;

impl FramingFilter for Raw {
    fn filter_inbound(&mut self, data: &mut [u8]) -> usize {
        data.len()
    }
}

/// Telnet framing: strips IAC sequences and the NUL of `CR NUL`, and
/// negotiates on connect.
#[derive(Debug, Clone, Copy)]
pub struct Telnet {
    negotiation: &'static [[u8; SEQUENCE_LEN]],
    stripped: usize,
    after_cr: bool,
}

impl Telnet {
    /// Telnet filter sending [`DEFAULT_NEGOTIATION`] on connect.
    pub const fn new() -> Self {
        Self::with_negotiation(DEFAULT_NEGOTIATION)
    }

    /// Telnet filter sending `negotiation` on connect. Pass `&[]` to stay
    /// silent.
    pub const fn with_negotiation(negotiation: &'static [[u8; SEQUENCE_LEN]]) -> Self {
        Self {
            negotiation,
            stripped: 0,
            after_cr: false,
        }
    }

    /// Number of control and padding bytes removed since this filter was
    /// created.
    pub fn stripped(&self) -> usize {
        self.stripped
    }

    /// Drop every NUL that directly follows a CR data byte.
    fn drop_cr_padding(&mut self, data: &mut [u8]) -> usize {
        let mut read = 0;
        let mut write = 0;

        while read < data.len() {
            let byte = data[read];
            read += 1;
            if byte == NUL && self.after_cr {
                self.after_cr = false;
                continue;
            }
            self.after_cr = byte == ASCII_CR;
            data[write] = byte;
            write += 1;
        }

        write
    }
}

impl Default for Telnet {
    fn default() -> Self {
        Self::new()
    }
}

impl FramingFilter for Telnet {
    fn filter_inbound(&mut self, data: &mut [u8]) -> usize {
        let len = strip_commands(data);
        let len = self.drop_cr_padding(&mut data[..len]);
        let removed = data.len() - len;
        if removed > 0 {
            trace!("telnet: stripped {} control bytes", removed);
        }
        self.stripped += removed;
        len
    }

    fn handshake(&self) -> &[[u8; SEQUENCE_LEN]] {
        self.negotiation
    }

    fn reset(&mut self) {
        self.after_cr = false;
    }
}

/// Remove every `IAC x y` sequence from `data` and compact the rest.
///
/// Returns the payload length. A sequence truncated by the end of `data` is
/// removed as far as it goes.
pub fn strip_commands(data: &mut [u8]) -> usize {
    let mut read = 0;
    let mut write = 0;

    while read < data.len() {
        if data[read] == IAC {
            read += SEQUENCE_LEN;
            continue;
        }
        data[write] = data[read];
        write += 1;
        read += 1;
    }

    write
}
