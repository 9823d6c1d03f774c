use heapless::Vec;

use super::{ASCII_BACKSPACE, ASCII_CR, ASCII_DEL, ASCII_LF, CMD_BUFFER_SIZE};
use crate::io::CliIo;

/// A completed input line, without its terminator.
pub type Line = Vec<u8, CMD_BUFFER_SIZE>;

/// Outcome of one [`LineEditor::feed`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Bytes of the input that were processed. Less than the input length
    /// only when a line completed; the rest belongs to the next line.
    pub consumed: usize,
    /// Terminators that arrived on an empty line (Enter with no input).
    pub empty_lines: usize,
    /// The line completed by this call, if any.
    pub line: Option<Line>,
}

/// Line accumulator with echo, destructive backspace and CR/LF/CRLF
/// handling.
///
/// The editor keeps its state between calls, so a line can arrive one
/// byte at a time or split anywhere across reads.
///
/// ```rust
/// use libcli::cli::LineEditor;
/// # use libcli::io::CliIo;
/// # struct Sink;
/// # impl CliIo for Sink {
/// #     fn put_byte(&mut self, _byte: u8) {}
/// #     fn get_byte(&mut self) -> Option<u8> { None }
/// #     fn byte_available(&mut self) -> bool { false }
/// # }
///
/// let mut editor = LineEditor::new();
/// let mut echo = Sink;
///
/// assert!(editor.feed(b"sta", &mut echo).line.is_none());
/// let feed = editor.feed(b"tx\x08us\r\nnext", &mut echo);
/// assert_eq!(feed.line.as_deref(), Some(&b"status"[..]));
/// assert_eq!(feed.consumed, 6);
/// ```
#[derive(Debug, Clone)]
pub struct LineEditor {
    buffer: Line,
    last_terminator: Option<u8>,
    echo: bool,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    /// Empty editor with echo enabled.
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            last_terminator: None,
            echo: true,
        }
    }

    /// Enable or disable echo of typed characters, line breaks and erase
    /// sequences.
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo = enabled;
    }

    /// Whether echo is enabled.
    pub fn echo(&self) -> bool {
        self.echo
    }

    /// The partial line typed so far.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Drop the partial line and the CR/LF pairing state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_terminator = None;
    }

    /// Process `bytes`, echoing to `io`, until a line completes or the
    /// input runs out.
    ///
    /// - Backspace (`0x08`) and DEL (`0x7F`) remove the last byte and emit
    ///   one erase sequence; on an empty line they do nothing.
    /// - CR or LF ends the line. An LF directly after a CR is swallowed.
    ///   Any other byte breaks the pair, so `CR x LF` ends two lines.
    ///   A terminator on an empty line only counts towards
    ///   [`Feed::empty_lines`].
    /// - Anything else is echoed and appended while there is room for it;
    ///   once the line holds `CMD_BUFFER_SIZE - 1` bytes, further bytes
    ///   are dropped.
    pub fn feed<IO: CliIo + ?Sized>(&mut self, bytes: &[u8], io: &mut IO) -> Feed {
        let mut feed = Feed::default();

        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                ASCII_CR | ASCII_LF => {
                    let crlf = byte == ASCII_LF && self.last_terminator == Some(ASCII_CR);
                    self.last_terminator = Some(byte);
                    if crlf {
                        continue;
                    }

                    if self.echo {
                        io.println();
                    }

                    if self.buffer.is_empty() {
                        feed.empty_lines += 1;
                        continue;
                    }

                    feed.consumed = i + 1;
                    feed.line = Some(core::mem::take(&mut self.buffer));
                    return feed;
                }
                ASCII_BACKSPACE | ASCII_DEL => {
                    self.last_terminator = None;
                    if self.buffer.pop().is_some() && self.echo {
                        io.send_backspace();
                    }
                }
                _ => {
                    self.last_terminator = None;
                    if self.buffer.len() < CMD_BUFFER_SIZE - 1 {
                        // Room was checked above.
                        let _ = self.buffer.push(byte);
                        if self.echo {
                            io.put_byte(byte);
                        }
                    }
                }
            }
        }

        feed.consumed = bytes.len();
        feed
    }
}
