use crate::redirect::Redirection;
use anyhow::Result;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Children killed by a signal are reported as `128 + signal`, the way POSIX
/// shells do.
pub type ExitCode = i32;

/// What the read-execute loop should do after a command has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Prompt for the next line.
    Continue,
    /// Leave the loop; the interpreter exits successfully.
    Terminate,
}

impl Continuation {
    pub fn should_exit(self) -> bool {
        self == Continuation::Terminate
    }
}

/// Runs external programs in child processes.
///
/// Every child created through a launcher is owned by it until the child
/// exits. [`crate::ProcessLauncher`] is the OS-backed implementation; the
/// interpreter is generic over this trait so process creation can be observed
/// or replaced.
pub trait Launcher {
    /// Runs `argv[0]` with `argv[1..]` as arguments, inheriting standard
    /// input, output and error. Blocks until the child exits.
    fn launch_plain(&mut self, argv: &[&str]) -> Result<ExitCode>;

    /// Runs `argv` with standard input and/or output remapped as described by
    /// `redirection`. `argv` must already be stripped of operators and file
    /// names. Blocks until the child exits.
    fn launch_redirected(&mut self, argv: &[&str], redirection: &Redirection) -> Result<ExitCode>;
}
