use core::fmt;

use super::{
    CommandArgs, CommandDefinition, DEFAULT_PROMPT, HELP_COMMAND, LineEditor, READ_CHUNK_SIZE,
    tokenize,
};
use crate::io::CliIo;

/// Help text of the built-in `help` command.
const HELP_DESCRIPTION: &str = "Show available commands";

/// What a single [`CliEngine::process_input`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// The transport is down. Nothing was sent or read.
    Disconnected,
    /// No input was available.
    Idle,
    /// Input was consumed but no command line completed.
    Pending,
    /// A command line was dispatched to `help` or a user command.
    Executed,
    /// A command line named an unknown command; the user was told so.
    NotFound,
}

/// The session driver: prompt, line editing, tokenizing and dispatch over
/// one [`CliIo`].
///
/// The engine owns the session state (line buffer, CR/LF pairing, prompt
/// flag and the unread part of the last transport chunk) and borrows the
/// application context and the command table for its whole lifetime.
///
/// Call [`process_input`](Self::process_input) from the main loop. After
/// the transport reconnects, call [`reset_session`](Self::reset_session) so
/// the new peer starts with a clean line.
pub struct CliEngine<'a, IO, C> {
    io: IO,
    context: &'a mut C,
    commands: &'a [CommandDefinition<C>],
    prompt: &'a str,
    editor: LineEditor,
    prompt_sent: bool,
    chunk: [u8; READ_CHUNK_SIZE],
    chunk_pos: usize,
    chunk_len: usize,
}

impl<IO, C> fmt::Debug for CliEngine<'_, IO, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliEngine")
            .field("commands", &self.commands.len())
            .field("prompt", &self.prompt)
            .field("editor", &self.editor)
            .field("prompt_sent", &self.prompt_sent)
            .field("unread", &(self.chunk_len - self.chunk_pos))
            .finish_non_exhaustive()
    }
}

impl<'a, IO: CliIo, C> CliEngine<'a, IO, C> {
    /// Create an engine using [`DEFAULT_PROMPT`].
    pub fn new(io: IO, context: &'a mut C, commands: &'a [CommandDefinition<C>]) -> Self {
        Self::with_prompt(io, context, commands, DEFAULT_PROMPT)
    }

    /// Create an engine with a custom prompt.
    pub fn with_prompt(
        io: IO,
        context: &'a mut C,
        commands: &'a [CommandDefinition<C>],
        prompt: &'a str,
    ) -> Self {
        Self {
            io,
            context,
            commands,
            prompt,
            editor: LineEditor::new(),
            prompt_sent: false,
            chunk: [0; READ_CHUNK_SIZE],
            chunk_pos: 0,
            chunk_len: 0,
        }
    }

    /// Enable or disable input echo. Enabled by default.
    ///
    /// Disable it when the remote terminal echoes locally. The prompt and
    /// command output are not affected.
    pub fn set_echo(&mut self, enabled: bool) {
        self.editor.set_echo(enabled);
    }

    /// Run one non-blocking iteration of the session.
    ///
    /// 1. Send the prompt unless it is already showing.
    /// 2. Take the unread rest of the previous chunk, or read one chunk of
    ///    at most [`READ_CHUNK_SIZE`] bytes. Nothing to read ends the call.
    /// 3. Feed the line editor. If a line completes, tokenize and dispatch
    ///    it and re-arm the prompt. Bytes after the line stay buffered for
    ///    the next call.
    pub fn process_input(&mut self) -> Status {
        if !self.io.is_connected() {
            return Status::Disconnected;
        }

        if !self.prompt_sent {
            self.io.send_prompt(self.prompt);
            self.prompt_sent = true;
        }

        if self.chunk_pos == self.chunk_len {
            self.chunk_pos = 0;
            self.chunk_len = self.io.get_bytes(&mut self.chunk);
            if self.chunk_len == 0 {
                return if self.io.is_connected() {
                    Status::Idle
                } else {
                    Status::Disconnected
                };
            }
        }

        let feed = self
            .editor
            .feed(&self.chunk[self.chunk_pos..self.chunk_len], &mut self.io);
        self.chunk_pos += feed.consumed;

        if feed.empty_lines > 0 {
            self.prompt_sent = false;
        }

        let Some(line) = feed.line else {
            return Status::Pending;
        };

        self.prompt_sent = false;
        self.run_line(line_to_str(&line))
    }

    /// Tokenize `command_line` and dispatch it, without touching the
    /// session state. Returns `true` if a command handled it.
    pub fn execute_command(&mut self, command_line: &str) -> bool {
        let args = tokenize(command_line);
        self.dispatch(&args)
    }

    /// Dispatch an already tokenized invocation.
    ///
    /// `help` is always handled by the built-in, even if the table has an
    /// entry of the same name. Other names are looked up in table order.
    /// Returns `false` for an empty invocation or an unknown name.
    pub fn dispatch(&mut self, args: &CommandArgs) -> bool {
        let Some(name) = args.name() else {
            return false;
        };

        if name == HELP_COMMAND {
            self.print_help();
            return true;
        }

        let commands = self.commands;
        match commands.iter().find(|command| command.name == name) {
            Some(command) => {
                trace!("cli: running {}", name);
                (command.execute)(args, &mut *self.context, &mut self.io);
                true
            }
            None => false,
        }
    }

    /// Print every command with its help text, names padded to a common
    /// width.
    pub fn print_help(&mut self) {
        let width = self
            .commands
            .iter()
            .map(|command| command.name.len())
            .fold(HELP_COMMAND.len(), usize::max);

        self.io.println();
        self.io.print_line("Available commands:");
        self.print_help_entry(width, HELP_COMMAND, HELP_DESCRIPTION);

        if self.commands.is_empty() {
            self.io.print_line("  (No additional commands registered)");
        } else {
            let commands = self.commands;
            for command in commands {
                self.print_help_entry(width, command.name, command.help);
            }
        }
        self.io.println();
    }

    /// Forget all partial input and show the prompt again on the next
    /// call. Use after the transport reconnected.
    pub fn reset_session(&mut self) {
        debug!(
            "cli: session reset, dropped {} pending bytes",
            self.editor.pending().len() + (self.chunk_len - self.chunk_pos)
        );
        self.editor.reset();
        self.prompt_sent = false;
        self.chunk_pos = 0;
        self.chunk_len = 0;
    }

    /// The I/O adapter.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// The I/O adapter, e.g. to reconnect it.
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// The application context.
    pub fn context(&self) -> &C {
        self.context
    }

    /// The application context.
    pub fn context_mut(&mut self) -> &mut C {
        self.context
    }

    /// The command table.
    pub fn commands(&self) -> &'a [CommandDefinition<C>] {
        self.commands
    }

    /// The prompt.
    pub fn prompt(&self) -> &str {
        self.prompt
    }

    /// The partial line typed so far.
    pub fn pending_input(&self) -> &[u8] {
        self.editor.pending()
    }

    fn run_line(&mut self, line: &str) -> Status {
        let args = tokenize(line);
        let Some(name) = args.name() else {
            return Status::Pending;
        };

        if self.dispatch(&args) {
            return Status::Executed;
        }

        info!("cli: unknown command {}", name);
        self.io.printf(format_args!(
            "Command \"{}\" not found. Type '{}' for available commands.\r\n",
            name, HELP_COMMAND
        ));
        Status::NotFound
    }

    fn print_help_entry(&mut self, width: usize, name: &str, help: &str) {
        self.io
            .printf(format_args!("  {:<width$} -- {}\r\n", name, help, width = width));
    }
}

/// The longest valid UTF-8 prefix of `line`.
fn line_to_str(line: &[u8]) -> &str {
    match core::str::from_utf8(line) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&line[..e.valid_up_to()]).unwrap_or_default(),
    }
}
