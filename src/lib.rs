//! A small interactive command interpreter with pipelines and history.
//!
//! This crate reads lines of input, interprets each one as either a built-in
//! operation (`exit`, `cd`, `history`) or a pipeline of external programs,
//! executes it, and keeps a bounded in-memory history of accepted lines that
//! can be listed, cleared or replayed by index. External stages are spawned
//! as separate processes chained through kernel pipes; builtins run in the
//! interpreter's own process so they can affect its state.
//!
//! There is intentionally no quoting, expansion, redirection or job control:
//! arguments are split on plain whitespace and pipelines on the literal pipe
//! character. The main entry point is [`Interpreter`], which owns the session
//! state and drives the read-eval loop.

mod builtin;
pub mod command;
mod executor;
pub mod history;
mod interpreter;
mod lexer;

pub use command::{Command, ExitCode, Pipeline};
pub use executor::Signal;
pub use history::History;
pub use interpreter::Interpreter;
pub use lexer::parse_pipeline;
