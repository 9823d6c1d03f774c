//! Interactive command line engine.
//!
//! This module turns a fragmented, unreliable byte stream into validated
//! command invocations and dispatches them to application handlers. It is
//! built for a cooperative main loop: [`CliEngine::process_input`] never
//! blocks, never allocates and handles at most one command per call.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │   CliIo     │──▶│ LineEditor  │──▶│ CommandArgs │──▶│  Dispatch   │
//! │ (+ framing) │   │ (echo, BS,  │   │ (tokenizer) │   │ (help, user │
//! │             │   │  CR/LF/CRLF)│   │             │   │  commands)  │
//! └─────────────┘   └─────────────┘   └─────────────┘   └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use libcli::cli::{CliEngine, CommandArgs, CommandDefinition};
//! use libcli::io::CliIo;
//! # struct Console { input: heapless::Deque<u8, 64>, output: heapless::Vec<u8, 512> }
//! # impl CliIo for Console {
//! #     fn put_byte(&mut self, byte: u8) { let _ = self.output.push(byte); }
//! #     fn get_byte(&mut self) -> Option<u8> { self.input.pop_front() }
//! #     fn byte_available(&mut self) -> bool { !self.input.is_empty() }
//! # }
//!
//! struct Board {
//!     led: bool,
//! }
//!
//! fn led(args: &CommandArgs, board: &mut Board, io: &mut dyn CliIo) {
//!     match args.get(1) {
//!         Some("on") => board.led = true,
//!         Some("off") => board.led = false,
//!         _ => io.print_line("usage: led <on|off>"),
//!     }
//! }
//!
//! static COMMANDS: &[CommandDefinition<Board>] = &[
//!     CommandDefinition::new("led", led, "Switch the LED"),
//! ];
//!
//! let mut console = Console { input: heapless::Deque::new(), output: heapless::Vec::new() };
//! for &b in b"led on\r\n" {
//!     console.input.push_back(b).unwrap();
//! }
//!
//! let mut board = Board { led: false };
//! let mut cli = CliEngine::new(&mut console, &mut board, COMMANDS);
//! cli.process_input();
//! assert!(cli.context().led);
//! ```

mod args;
mod command;
mod editor;
mod engine;


pub use args::{Arg, CommandArgs, tokenize};
pub use command::{CommandDefinition, CommandFn};
pub use editor::{Feed, Line, LineEditor};
pub use engine::{CliEngine, Status};

/// Maximum number of arguments per command, including the command name.
pub const MAX_ARGS: usize = 5;

/// Size of one argument slot. Arguments keep at most
/// `MAX_ARG_LENGTH - 1` bytes; the rest is dropped.
pub const MAX_ARG_LENGTH: usize = 12;

/// Size of the line buffer. A line holds at most `CMD_BUFFER_SIZE - 1`
/// bytes; further input is dropped until the line is terminated.
pub const CMD_BUFFER_SIZE: usize = 128;

/// Maximum number of bytes pulled from the transport per engine call.
pub const READ_CHUNK_SIZE: usize = 32;

/// Prompt used by [`CliEngine::new`]: bold `mcli> `.
pub const DEFAULT_PROMPT: &str = "\x1b[1mmcli> \x1b[0m";

/// Name of the built-in help command.
pub const HELP_COMMAND: &str = "help";

// ASCII control character constants for input processing
/// ASCII backspace character (0x08).
pub const ASCII_BACKSPACE: u8 = 0x08;
/// ASCII line feed character (0x0A).
pub const ASCII_LF: u8 = 0x0A;
/// ASCII carriage return character (0x0D).
pub const ASCII_CR: u8 = 0x0D;
/// ASCII delete character (0x7F).
pub const ASCII_DEL: u8 = 0x7F;
/// ASCII space character (0x20).
pub const ASCII_SPACE: u8 = 0x20;
