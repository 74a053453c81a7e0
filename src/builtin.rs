//! Built-in commands executed inside the shell process: `exit`, `cd` and
//! `history`.
//!
//! Builtins are parsed with the [`argh`] crate (`FromArgs`) and run directly
//! in-process. None of them read from a piped stdin, and only the `history`
//! listing writes to the provided output stream; every failure is reported as
//! a one-line `error: ...` message on stderr.
//!
//! A builtin may only appear as the sole stage of a pipeline; the executor
//! rejects multi-stage pipelines that mention a builtin name before spawning
//! anything.

use crate::command::{Command, ExitCode};
use crate::executor::{self, Signal};
use crate::history::History;
use crate::lexer;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::io::Write;

/// Names resolved in-process instead of being spawned.
const BUILTIN_NAMES: [&str; 3] = ["exit", "cd", "history"];

/// Whether `name` is handled in-process.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Outcome of offering a command to the dispatcher.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The name is not a builtin; the executor should spawn it.
    NotBuiltin,
    /// The read-eval loop should terminate after its normal cleanup.
    Exit,
    /// The builtin ran in-process and produced this status.
    Handled(ExitCode),
}

/// Run `cmd` in-process if its program is a builtin.
///
/// `stdout` receives the `history` listing (the only builtin output that is
/// not an error); it is the caller's primary output stream. A recalled `exit`
/// propagates as [`Dispatch::Exit`] so the outer loop still cleans up.
pub fn try_handle(cmd: &Command, history: &mut History, stdout: &mut dyn Write) -> Dispatch {
    match cmd.program() {
        // `exit` ignores its arguments and never terminates the process
        // itself; the loop owns the teardown.
        Some("exit") => Dispatch::Exit,
        Some("cd") => match parse::<Cd>("cd", cmd.args(), stdout) {
            Ok(cd) => Dispatch::Handled(run_cd(cd)),
            Err(status) => Dispatch::Handled(status),
        },
        Some("history") => match parse::<HistoryCmd>("history", cmd.args(), stdout) {
            Ok(args) => run_history(args, history, stdout),
            Err(status) => Dispatch::Handled(status),
        },
        _ => Dispatch::NotBuiltin,
    }
}

/// Parse builtin arguments, mapping argh's early exits (`--help`, unknown
/// flags) to an already-reported status.
fn parse<T: FromArgs>(name: &str, args: &[String], stdout: &mut dyn Write) -> Result<T, ExitCode> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match T::from_args(&[name], &args) {
        Ok(parsed) => Ok(parsed),
        Err(EarlyExit { output, status }) => {
            if status.is_err() {
                eprintln!("error: {}", output.trim_end());
                Err(1)
            } else {
                let _ = writeln!(stdout, "{}", output.trim_end());
                Err(0)
            }
        }
    }
}

#[derive(FromArgs)]
/// change the shell's current working directory
struct Cd {
    #[argh(positional)]
    /// directory to switch to, absolute or relative to the current directory
    target: Option<String>,
}

fn run_cd(cd: Cd) -> ExitCode {
    let Some(target) = cd.target else {
        eprintln!("error: missing argument");
        return 1;
    };
    if std::env::set_current_dir(&target).is_err() {
        eprintln!("error: unable to change dir");
        return 1;
    }
    0
}

#[derive(FromArgs)]
/// list stored input lines, clear them, or replay one by index
struct HistoryCmd {
    #[argh(switch, short = 'c')]
    /// drop every stored entry
    clear: bool,

    #[argh(positional)]
    /// index of the entry to re-execute
    index: Option<String>,
}

fn run_history(args: HistoryCmd, history: &mut History, stdout: &mut dyn Write) -> Dispatch {
    if args.clear {
        history.clear();
        return Dispatch::Handled(0);
    }

    let Some(raw_index) = args.index else {
        return match list_entries(history, stdout) {
            Ok(()) => Dispatch::Handled(0),
            Err(e) => {
                eprintln!("error: {}", e);
                Dispatch::Handled(1)
            }
        };
    };

    let Ok(index) = raw_index.parse::<usize>() else {
        eprintln!("error: cannot convert to number");
        return Dispatch::Handled(1);
    };
    let Some(stored) = history.get(index) else {
        eprintln!("error: offset > number of items");
        return Dispatch::Handled(1);
    };

    // Replay: re-tokenize the stored text and run it as a fresh pipeline.
    // The recalled pipeline's status becomes this command's own result, and
    // nothing here touches the store, so the recall leaves no entry behind.
    let line = stored.to_owned();
    let pipeline = lexer::parse_pipeline(&line);
    match executor::execute(pipeline, history) {
        Signal::Continue(status) => Dispatch::Handled(status),
        Signal::Exit => Dispatch::Exit,
    }
}

fn list_entries(history: &History, stdout: &mut dyn Write) -> Result<()> {
    for (index, line) in history.list() {
        writeln!(stdout, "{} {}", index, line)?;
    }
    Ok(())
}
