//! A small interactive command interpreter.
//!
//! Each input line is split on whitespace into a [`TokenSequence`]. The first
//! token names either a built-in (`cd`, `path`, `exit`), which runs inside the
//! interpreter, or an external program, which runs in a child process with
//! optional `<`/`>` redirection of its standard input and output.
//!
//! [`Interpreter`] ties these together and provides the read-execute loop.
//! Process creation goes through the [`Launcher`] trait, implemented for real
//! processes by [`ProcessLauncher`].

mod builtin;
pub mod command;
pub mod config;
mod external;
mod interpreter;
pub mod lexer;
pub mod redirect;

pub use builtin::Builtin;
pub use command::{Continuation, ExitCode, Launcher};
pub use config::Config;
pub use external::{ProcessLauncher, find_command_path};
pub use interpreter::Interpreter;
pub use lexer::{TokenSequence, split_into_tokens};
pub use redirect::Redirection;

/// Prefix of every diagnostic line written to standard error.
pub const PROGRAM_NAME: &str = "cmdsh";
