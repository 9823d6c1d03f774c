use core::fmt;

use heapless::{String, Vec};

use super::{ASCII_SPACE, MAX_ARG_LENGTH, MAX_ARGS};

/// One argument slot.
pub type Arg = String<{ MAX_ARG_LENGTH - 1 }>;

/// A tokenized command line: `argc` arguments, `argv[0]` being the command
/// name.
///
/// Capacity is fixed: at most [`MAX_ARGS`] arguments of at most
/// `MAX_ARG_LENGTH - 1` bytes each. Anything beyond that is silently
/// dropped during [`tokenize`].
///
/// # Examples
///
/// ```rust
/// use libcli::cli::CommandArgs;
///
/// let args = CommandArgs::parse("  led   on  ");
/// assert_eq!(args.argc(), 2);
/// assert_eq!(args.name(), Some("led"));
/// assert_eq!(args.get(1), Some("on"));
/// assert_eq!(args.get(2), None);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    argv: Vec<Arg, MAX_ARGS>,
}

impl CommandArgs {
    /// An empty invocation (`argc == 0`).
    pub const fn new() -> Self {
        Self { argv: Vec::new() }
    }

    /// Tokenize `line`. Same as [`tokenize`].
    pub fn parse(line: &str) -> Self {
        tokenize(line)
    }

    /// Number of arguments, including the command name.
    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    /// `true` when the line held no tokens.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }

    /// The command name (`argv[0]`).
    pub fn name(&self) -> Option<&str> {
        self.get(0)
    }

    /// Argument `index`, `argv[0]` being the command name.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.argv.get(index).map(|arg| arg.as_str())
    }

    /// All arguments, command name first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.argv.iter().map(|arg| arg.as_str())
    }

    /// The arguments following the command name.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.iter().skip(1)
    }
}

impl fmt::Debug for CommandArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandArgs {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[");
        for (i, arg) in self.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{=str}", arg);
        }
        defmt::write!(f, "]");
    }
}

/// Split `line` on runs of spaces into a [`CommandArgs`].
///
/// - Leading, trailing and repeated spaces never produce empty tokens.
/// - Only the first [`MAX_ARGS`] tokens are kept.
/// - Each token is cut to `MAX_ARG_LENGTH - 1` bytes, on a character
///   boundary.
///
/// ```rust
/// use libcli::cli::tokenize;
///
/// let args = tokenize("led on extra1 extra2 extra3 extra4");
/// assert_eq!(args.argc(), 5);
/// assert_eq!(args.get(4), Some("extra3"));
///
/// let args = tokenize("set verylongargumentname");
/// assert_eq!(args.get(1), Some("verylongarg"));
/// ```
pub fn tokenize(line: &str) -> CommandArgs {
    let mut args = CommandArgs::new();

    for token in line.split(ASCII_SPACE as char).filter(|t| !t.is_empty()) {
        let mut arg = Arg::new();
        for ch in token.chars() {
            if arg.push(ch).is_err() {
                break;
            }
        }
        if args.argv.push(arg).is_err() {
            break;
        }
    }

    args
}
