//! Input/output redirection: extracting `<` and `>` from a command line and
//! opening the files a child's standard streams are remapped to.

use anyhow::{Context, Result, anyhow, bail};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;

/// Permission bits of files created by output redirection.
pub const OUTPUT_FILE_MODE: u32 = 0o644;

/// A redirection operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `<`: standard input reads from a file.
    ReadIn,
    /// `>`: standard output is written to a file, truncating it.
    WriteOut,
}

impl FromStr for Operator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "<" => Ok(Operator::ReadIn),
            ">" => Ok(Operator::WriteOut),
            _ => Err(anyhow!("not a redirection operator: {}", s)),
        }
    }
}

impl Operator {
    pub fn is_operator(token: &str) -> bool {
        token.parse::<Operator>().is_ok()
    }

    fn symbol(self) -> &'static str {
        match self {
            Operator::ReadIn => "<",
            Operator::WriteOut => ">",
        }
    }
}

/// Files a child's standard input and output should be connected to.
///
/// `None` leaves the corresponding stream inherited from the interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirection {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Redirection {
    /// True when any token is exactly `<` or `>`.
    pub fn is_requested(tokens: &[&str]) -> bool {
        tokens.iter().any(|token| Operator::is_operator(token))
    }

    /// Separates redirections from the program's argument list.
    ///
    /// Every operator and the token right after it are removed from the
    /// returned argv. When an operator repeats, the last file name wins.
    /// An operator without a following file name is an error.
    pub fn parse<'a>(tokens: &[&'a str]) -> Result<(Vec<&'a str>, Redirection)> {
        let mut argv = Vec::with_capacity(tokens.len());
        let mut redirection = Redirection::default();
        let mut tokens = tokens.iter().copied();

        while let Some(token) = tokens.next() {
            let Ok(operator) = token.parse::<Operator>() else {
                argv.push(token);
                continue;
            };
            let Some(file) = tokens.next() else {
                bail!("syntax error: expected a file name after `{}`", operator.symbol());
            };
            match operator {
                Operator::ReadIn => redirection.input = Some(PathBuf::from(file)),
                Operator::WriteOut => redirection.output = Some(PathBuf::from(file)),
            }
        }

        if argv.is_empty() {
            bail!("syntax error: missing command before redirection");
        }
        Ok((argv, redirection))
    }

    /// Opens the input file read-only, or inherits standard input.
    pub fn stdin(&self) -> Result<Stdio> {
        match &self.input {
            Some(path) => Ok(open_input(path)?.into()),
            None => Ok(Stdio::inherit()),
        }
    }

    /// Creates or truncates the output file, or inherits standard output.
    pub fn stdout(&self) -> Result<Stdio> {
        match &self.output {
            Some(path) => Ok(create_output(path)?.into()),
            None => Ok(Stdio::inherit()),
        }
    }
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("cannot open {}", path.display()))
}

fn create_output(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_FILE_MODE);
    }
    options
        .open(path)
        .with_context(|| format!("cannot create {}", path.display()))
}
