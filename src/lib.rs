//! # libcli - non-blocking command line engine for embedded targets
//!
//! An interactive command line for devices that run a cooperative main
//! loop: no threads, no heap, no blocking calls. The same engine serves a
//! UART console and a telnet session over TCP.
//!
//! ## Features
//!
//! ### Command line
//! - Line editing with echo, destructive backspace and CR/LF/CRLF handling
//! - Whitespace tokenizer with fixed argument limits
//! - Static command tables with a built-in `help`
//! - One command per [`process_input`](cli::CliEngine::process_input) call
//!
//! ### Transports
//! - [`io::CliIo`] capability trait with default printing helpers
//! - UART adapter over `embedded-io`
//! - Stream adapter over the [`network`] connection traits, with telnet
//!   control sequence filtering and option negotiation
//! - Host TCP support with the `std` feature
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libcli = "0.1.0"
//! ```
//!
//! ### Serial console
//!
//! ```rust,no_run
//! use libcli::cli::{CliEngine, CommandArgs, CommandDefinition};
//! use libcli::io::{CliIo, serial::SerialIo};
//! # struct Uart;
//! # impl embedded_io::ErrorType for Uart { type Error = core::convert::Infallible; }
//! # impl embedded_io::Read for Uart {
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl embedded_io::ReadReady for Uart {
//! #     fn read_ready(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # impl embedded_io::Write for Uart {
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! fn version(_args: &CommandArgs, _ctx: &mut (), io: &mut dyn CliIo) {
//!     io.print_line("1.4.2");
//! }
//!
//! static COMMANDS: &[CommandDefinition<()>] = &[
//!     CommandDefinition::new("version", version, "Print the firmware version"),
//! ];
//!
//! let mut ctx = ();
//! let mut cli = CliEngine::new(SerialIo::new(Uart), &mut ctx, COMMANDS);
//! loop {
//!     cli.process_input();
//!     // other cooperative tasks
//! }
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux hosts, for development and testing
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: TCP transport over `std::net` (default: disabled)
//! - `defmt`: `defmt::Format` for public types and internal logging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod logging;

/// Command line engine: line editor, tokenizer, command table and session
/// driver.
pub mod cli;

/// Byte-level I/O capability and transport adapters.
pub mod io;

/// Connection traits shared by stream transports.
///
/// Contains the non-blocking `Read`, `Write`, `Close` and `Bind` traits the
/// stream adapter is generic over, plus the host TCP implementation.
pub mod network;
