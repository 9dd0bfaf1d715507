use crate::PROGRAM_NAME;
use crate::builtin::Builtin;
use crate::command::{Continuation, Launcher};
use crate::config::Config;
use crate::external::ProcessLauncher;
use crate::lexer::{self, TokenSequence};
use crate::redirect::Redirection;
use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::{self, Write};

/// A minimal shell-like interpreter that runs built-ins in-process and
/// everything else through a [`Launcher`].
///
/// Example
/// ```
/// use cmdsh::{Continuation, Interpreter};
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.execute_line("exit"), Continuation::Terminate);
/// ```
pub struct Interpreter<L = ProcessLauncher> {
    launcher: L,
}

impl<L: Launcher> Interpreter<L> {
    /// Create an interpreter that launches external programs with `launcher`.
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Tokenizes and dispatches one line, using the process's standard
    /// output and error.
    pub fn execute_line(&mut self, line: &str) -> Continuation {
        let tokens = lexer::split_into_tokens(line);
        self.execute(&tokens, &mut io::stdout(), &mut io::stderr())
    }

    /// Dispatches one parsed command.
    ///
    /// Any failure is written to `stderr` as a single diagnostic line and the
    /// loop is told to continue; only `exit` terminates. A diagnostic that
    /// cannot be written is logged instead.
    pub fn execute(
        &mut self,
        tokens: &TokenSequence<'_>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Continuation {
        match self.dispatch(tokens, stdout) {
            Ok(signal) => signal,
            Err(err) => {
                if let Err(write_err) = writeln!(stderr, "{}: {:#}", PROGRAM_NAME, err) {
                    warn!("could not report {:#}: {}", err, write_err);
                }
                Continuation::Continue
            }
        }
    }

    fn dispatch(
        &mut self,
        tokens: &TokenSequence<'_>,
        stdout: &mut dyn Write,
    ) -> anyhow::Result<Continuation> {
        let Some(name) = tokens.command() else {
            return Ok(Continuation::Continue);
        };

        if let Some(builtin) = Builtin::lookup(name) {
            debug!("dispatching builtin {:?}", builtin);
            let signal = builtin.run(tokens.args(), stdout);
            stdout.flush()?;
            return signal;
        }

        let code = if Redirection::is_requested(tokens.as_slice()) {
            let (argv, redirection) = Redirection::parse(tokens.as_slice())?;
            debug!("dispatching {:?} with {:?}", argv, redirection);
            self.launcher.launch_redirected(&argv, &redirection)?
        } else {
            debug!("dispatching {:?}", tokens.as_slice());
            self.launcher.launch_plain(tokens.as_slice())?
        };
        debug!("{} finished with exit code {}", name, code);
        Ok(Continuation::Continue)
    }

    /// Interactive read-execute loop.
    ///
    /// Returns `Ok` when `exit` is run or input ends. Ctrl-C discards the
    /// current line and prompts again, and so does a line that is not valid
    /// UTF-8, after a diagnostic. Any other read failure is returned.
    pub fn repl(&mut self, config: &Config) -> Result<()> {
        let mut rl = DefaultEditor::with_config(config.line_editor_config()?)?;
        if let Some(history) = &config.history_file {
            if let Err(err) = rl.load_history(history) {
                warn!("could not load history from {}: {}", history.display(), err);
            }
        }

        let outcome = self.read_execute(&mut rl, &config.prompt);

        if let Some(history) = &config.history_file {
            if let Err(err) = rl.save_history(history) {
                warn!("could not save history to {}: {}", history.display(), err);
            }
        }
        outcome
    }

    fn read_execute(&mut self, rl: &mut DefaultEditor, prompt: &str) -> Result<()> {
        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if self.execute_line(&line).should_exit() {
                        debug!("exit requested");
                        return Ok(());
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                // The offending bytes are already consumed; the next read
                // starts at the following line.
                Err(ReadlineError::Io(err)) if err.kind() == io::ErrorKind::InvalidData => {
                    eprintln!("{}: {}", PROGRAM_NAME, err);
                }
                Err(ReadlineError::Eof) => {
                    debug!("end of input");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for Interpreter<ProcessLauncher> {
    /// Create an interpreter that runs external programs as child processes,
    /// resolving them through `PATH`.
    fn default() -> Self {
        Self::new(ProcessLauncher::new())
    }
}
