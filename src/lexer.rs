//! Splits one line of input into a pipeline of whitespace-delimited commands.
//!
//! There is deliberately no quoting, escaping or expansion here: the pipe
//! character and whitespace can never appear literally inside an argument.

use crate::command::{Command, Pipeline};

/// Maximum number of tokens (program included) kept per command.
///
/// Tokens beyond this count are dropped with a warning rather than silently,
/// so an over-long command line is visible to the user.
pub const MAX_ARGS: usize = 1024;

/// Parse a line into a [`Pipeline`] by splitting on the literal pipe character.
///
/// The interpreter guarantees the line is neither blank nor pipe-leading, so
/// the result always has at least one stage. A stage that tokenizes to zero
/// arguments (e.g. `"a | | b"`) is kept as an empty [`Command`]; the executor
/// rejects it before running anything.
///
/// Same input always yields the same pipeline; no state is consulted.
pub fn parse_pipeline(line: &str) -> Pipeline {
    Pipeline::new(line.split('|').map(parse_command).collect())
}

fn parse_command(text: &str) -> Command {
    let mut tokens = text.split_whitespace();
    let argv: Vec<String> = tokens.by_ref().take(MAX_ARGS).map(str::to_owned).collect();
    if tokens.next().is_some() {
        eprintln!("warning: argument list truncated at {} tokens", MAX_ARGS);
    }
    Command::new(argv)
}
