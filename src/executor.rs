//! Runs a parsed pipeline: builtins in-process, everything else as spawned
//! child processes chained through kernel pipes.
//!
//! The orchestrator is single-threaded and relays no data itself: for an
//! N-stage pipeline it creates exactly N-1 pipes, hands each child only the
//! two ends it needs, and then blocks until every spawned child has
//! terminated. Spawned stages run concurrently with each other; the only
//! ordering guarantee is the byte order each pipe preserves.

use crate::builtin::{self, Dispatch};
use crate::command::{Command, ExitCode, Pipeline};
use crate::history::History;
use std::process::{Child, ChildStdout, ExitStatus, Stdio};

/// Status reported for a stage whose program could not be started.
const SPAWN_FAILURE_STATUS: ExitCode = 127;

/// Tells the read-eval loop whether to keep going.
#[derive(Debug, PartialEq, Eq)]
pub enum Signal {
    /// The pipeline finished with this status; read the next line.
    Continue(ExitCode),
    /// `exit` was invoked; terminate the loop after normal cleanup.
    Exit,
}

/// Execute one pipeline to completion.
///
/// A single builtin stage is dispatched in-process; external stages are
/// spawned and waited for. The pipeline is consumed by the call and released
/// when it returns, whatever the outcome. `history` is threaded through so a
/// `history N` recall can nest another full execution of the same operation.
pub fn execute(pipeline: Pipeline, history: &mut History) -> Signal {
    execute_with_output(pipeline, history, false).0
}

/// Body of [`execute`] with an optional capture of the final stage's output,
/// so tests can observe the bytes that crossed the last pipe.
fn execute_with_output(
    pipeline: Pipeline,
    history: &mut History,
    capture: bool,
) -> (Signal, Vec<u8>) {
    let mut captured = Vec::new();

    // An empty stage means the line had adjacent, leading or trailing pipes.
    if pipeline.stages.iter().any(|stage| stage.argv.is_empty()) {
        eprintln!("error: empty command in pipeline");
        return (Signal::Continue(1), captured);
    }

    if pipeline.is_simple() {
        let stage = &pipeline.stages[0];
        let dispatch = if capture {
            builtin::try_handle(stage, history, &mut captured)
        } else {
            builtin::try_handle(stage, history, &mut std::io::stdout())
        };
        match dispatch {
            Dispatch::Exit => return (Signal::Exit, captured),
            Dispatch::Handled(status) => return (Signal::Continue(status), captured),
            Dispatch::NotBuiltin => {}
        }
    } else if pipeline
        .stages
        .iter()
        .any(|stage| stage.program().is_some_and(builtin::is_builtin))
    {
        // Builtins mutate the orchestrator's own state (cwd, history), which
        // has no meaning halfway down a pipe. Reject before spawning anything.
        eprintln!("error: no builtins in pipe");
        return (Signal::Continue(1), captured);
    }

    let status = spawn_pipeline(pipeline.stages, capture, &mut captured);
    (Signal::Continue(status), captured)
}

/// Spawn every stage, then wait for all of them.
///
/// Stage 0 reads the inherited stdin and the last stage writes the inherited
/// stdout (or a capture pipe); each interior boundary is one kernel pipe whose
/// write end lives in the upstream child and whose read end is moved into the
/// downstream spawn. The orchestrator keeps no pipe handle once the
/// downstream stage is up, so a child can never hold a sibling's write end
/// open and starve a reader of end-of-stream.
fn spawn_pipeline(stages: Vec<Command>, capture: bool, captured: &mut Vec<u8>) -> ExitCode {
    let stage_count = stages.len();
    let mut children: Vec<Child> = Vec::with_capacity(stage_count);
    let mut upstream: Option<ChildStdout> = None;
    let mut status = 0;

    for (i, stage) in stages.into_iter().enumerate() {
        let last = i + 1 == stage_count;

        let mut cmd = std::process::Command::new(&stage.argv[0]);
        cmd.args(&stage.argv[1..]);
        cmd.stdin(match upstream.take() {
            Some(read_end) => Stdio::from(read_end),
            // A stage whose upstream failed to spawn reads immediate
            // end-of-input instead of blocking on a pipe nobody writes.
            None if i > 0 => Stdio::null(),
            None => Stdio::inherit(),
        });
        cmd.stdout(if !last || capture {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });

        match cmd.spawn() {
            Ok(mut child) => {
                if !last {
                    upstream = child.stdout.take();
                }
                children.push(child);
            }
            Err(e) => {
                // The remaining stages still get their chance to run.
                eprintln!("error: {}: {}", stage.argv[0], e);
                status = SPAWN_FAILURE_STATUS;
            }
        }
    }

    // The overall status is simply whichever wait finished last.
    let final_child = if capture { children.pop() } else { None };
    for mut child in children {
        match child.wait() {
            Ok(exit_status) => status = exit_code(exit_status),
            Err(e) => eprintln!("error: {}", e),
        }
    }
    if let Some(child) = final_child {
        match child.wait_with_output() {
            Ok(output) => {
                status = exit_code(output.status);
                captured.extend_from_slice(&output.stdout);
            }
            Err(e) => {
                eprintln!("error: {}", e);
                status = 1;
            }
        }
    }
    status
}

fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(code) => code,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::parse_pipeline;

    fn run_captured(line: &str) -> (Signal, String) {
        let mut history = History::new();
        let (signal, bytes) = execute_with_output(parse_pipeline(line), &mut history, true);
        (signal, String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn single_external_command_reports_its_status() {
        let mut history = History::new();
        assert_eq!(
            execute(parse_pipeline("/bin/true"), &mut history),
            Signal::Continue(0)
        );
        assert_eq!(
            execute(parse_pipeline("/bin/false"), &mut history),
            Signal::Continue(1)
        );
    }

    #[test]
    fn two_stage_pipeline_moves_bytes_downstream() {
        let (signal, out) = run_captured("/bin/echo hello|/bin/cat");
        assert_eq!(signal, Signal::Continue(0));
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn three_stage_pipeline_preserves_the_stream() {
        let (signal, out) = run_captured("/bin/echo one two|/bin/cat|/bin/cat");
        assert_eq!(signal, Signal::Continue(0));
        assert_eq!(out, "one two\n");
    }

    #[test]
    fn unresolvable_program_reports_distinguished_status() {
        let mut history = History::new();
        assert_eq!(
            execute(parse_pipeline("/nonexistent/program"), &mut history),
            Signal::Continue(SPAWN_FAILURE_STATUS)
        );
    }

    #[test]
    fn failed_upstream_spawn_does_not_hang_downstream() {
        let (_, out) = run_captured("/nonexistent/program|/bin/cat");
        assert!(out.is_empty());
    }

    #[test]
    fn builtin_in_multi_stage_pipeline_is_rejected() {
        let (signal, out) = run_captured("/bin/echo hi|cd /tmp");
        assert_eq!(signal, Signal::Continue(1));
        assert!(out.is_empty());

        let (signal, _) = run_captured("history|/bin/cat");
        assert_eq!(signal, Signal::Continue(1));
    }

    #[test]
    fn empty_stage_is_rejected() {
        let (signal, _) = run_captured("/bin/echo hi||/bin/cat");
        assert_eq!(signal, Signal::Continue(1));

        let (signal, _) = run_captured("/bin/echo hi|");
        assert_eq!(signal, Signal::Continue(1));
    }

    #[test]
    fn single_builtin_stage_dispatches_in_process() {
        let mut history = History::new();
        history.record("/bin/true");
        let (signal, bytes) =
            execute_with_output(parse_pipeline("history"), &mut history, true);
        assert_eq!(signal, Signal::Continue(0));
        assert_eq!(String::from_utf8(bytes).unwrap(), "0 /bin/true\n");
    }

    #[test]
    fn exit_signal_propagates_from_builtin() {
        let mut history = History::new();
        assert_eq!(execute(parse_pipeline("exit"), &mut history), Signal::Exit);
    }

    #[test]
    fn recalled_pipeline_re_executes_as_full_pipeline() {
        let mut history = History::new();
        history.record("/bin/echo hi|/bin/cat");
        let (signal, _) = execute_with_output(parse_pipeline("history 0"), &mut history, true);
        assert_eq!(signal, Signal::Continue(0));
        assert_eq!(history.len(), 1);
    }
}
