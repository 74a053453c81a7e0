/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// One pipeline stage: a program name followed by its arguments.
///
/// `argv[0]` is the program, passed to the OS as-given. The argument list is
/// dynamically sized but capped at [`crate::lexer::MAX_ARGS`] tokens by the
/// lexer. A `Command` carries no I/O handles; the executor decides the wiring
/// for each stage at spawn time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The program name and its arguments, program first.
    pub argv: Vec<String>,
}

impl Command {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    /// The program to run, or `None` for a pathological empty stage
    /// (e.g. the text between two adjacent pipe characters).
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// The arguments after the program name.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

/// An ordered sequence of commands whose outputs feed the next stage's input.
///
/// Produced by [`crate::lexer::parse_pipeline`] from one line of input.
/// Always has at least one stage for any line the interpreter accepts;
/// a single-stage pipeline is the simple-command case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<Command>,
}

impl Pipeline {
    pub fn new(stages: Vec<Command>) -> Self {
        Self { stages }
    }

    /// Whether this is a plain command rather than a multi-stage pipeline.
    pub fn is_simple(&self) -> bool {
        self.stages.len() == 1
    }
}
