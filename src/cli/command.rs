use core::fmt;

use super::CommandArgs;
use crate::io::CliIo;

/// Handler invoked for a matching command.
///
/// Receives the parsed invocation, the application context the engine was
/// built with, and the engine's I/O so it can answer the user.
///
/// # Examples
///
/// ```rust
/// use libcli::cli::{CommandArgs, CommandFn};
/// use libcli::io::CliIo;
///
/// struct Uptime {
///     seconds: u32,
/// }
///
/// let uptime: CommandFn<Uptime> = |_args, ctx, io| {
///     io.printf(format_args!("up {} s\r\n", ctx.seconds));
/// };
/// ```
pub type CommandFn<C> = fn(args: &CommandArgs, context: &mut C, io: &mut dyn CliIo);

/// A command table entry: name, handler and one line of help text.
///
/// Tables are plain slices, usually `static`, and must outlive the engine
/// that dispatches from them. Names are matched exactly and
/// case-sensitively; the first entry with a matching name wins.
///
/// ```rust
/// use libcli::cli::{CommandArgs, CommandDefinition};
/// use libcli::io::CliIo;
///
/// fn reboot(_args: &CommandArgs, _ctx: &mut (), io: &mut dyn CliIo) {
///     io.print_line("rebooting");
/// }
///
/// static COMMANDS: &[CommandDefinition<()>] = &[
///     CommandDefinition::new("reboot", reboot, "Restart the device"),
/// ];
/// assert_eq!(COMMANDS[0].name, "reboot");
/// ```
pub struct CommandDefinition<C> {
    /// The command name as typed by the user.
    pub name: &'static str,

    /// The function that implements the command.
    pub execute: CommandFn<C>,

    /// Short description shown by `help`.
    pub help: &'static str,
}

impl<C> CommandDefinition<C> {
    /// Build a table entry.
    pub const fn new(name: &'static str, execute: CommandFn<C>, help: &'static str) -> Self {
        Self {
            name,
            execute,
            help,
        }
    }
}

impl<C> Clone for CommandDefinition<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for CommandDefinition<C> {}

impl<C> fmt::Debug for CommandDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}
