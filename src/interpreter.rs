//! The interactive read-eval loop and the session state it owns.

use crate::command::Pipeline;
use crate::executor::{self, Signal};
use crate::history::History;
use crate::lexer;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// An interactive session: the read-eval loop plus the history it owns.
///
/// The [`History`] lives here rather than in any global so that a `history N`
/// recall interacts with it through an explicit borrow, exactly as if the
/// recalled line had been typed at the prompt.
///
/// Example
/// ```
/// use pipeshell::{Interpreter, Signal};
/// let mut sh = Interpreter::new();
/// assert_eq!(sh.eval_line("/bin/true"), Signal::Continue(0));
/// ```
pub struct Interpreter {
    history: History,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            history: History::new(),
        }
    }

    /// Process one line of input and report whether the loop should go on.
    ///
    /// Blank lines and lines that begin with the pipe character are skipped
    /// silently: nothing is recorded and nothing runs. Everything else is
    /// tokenized, recorded (subject to the history self-pollution rule) and
    /// handed to the executor. Recording happens before execution, so the
    /// line being executed is already visible as the newest entry.
    pub fn eval_line(&mut self, line: &str) -> Signal {
        if is_blank(line) || line.starts_with('|') {
            return Signal::Continue(0);
        }

        let pipeline = lexer::parse_pipeline(line);
        if should_record(&pipeline) {
            self.history.record(line);
        }
        executor::execute(pipeline, &mut self.history)
    }

    /// The Read-Eval-Print Loop: prompt, read, evaluate, repeat.
    ///
    /// Terminates on `exit`, end-of-input or an interrupt; the session
    /// history is dropped with the interpreter, nothing persists.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline("$ ") {
                Ok(line) => {
                    // rustyline's edit history (arrow keys) is independent of
                    // the session history the `history` builtin reports.
                    rl.add_history_entry(line.as_str())?;
                    if self.eval_line(&line) == Signal::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// Inspecting or replaying history must not itself pollute history, so a
/// plain `history` invocation is never recorded; a pipeline that merely
/// contains `history` as one of several stages is.
fn should_record(pipeline: &Pipeline) -> bool {
    !pipeline.is_simple() || pipeline.stages[0].program() != Some("history")
}
