use crate::command::{ExitCode, Launcher};
use crate::redirect::Redirection;
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Launches external programs as child processes of the interpreter.
///
/// Both launch paths wait for the child to exit. A child that is merely
/// stopped is still waited for. Failing to start a child is returned as an
/// error and never takes the interpreter down.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    search_paths: Option<OsString>,
}

impl ProcessLauncher {
    /// Resolves bare program names against the `PATH` of the interpreter
    /// process, read at each launch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves bare program names against `search_paths` instead of `PATH`.
    pub fn with_search_paths(search_paths: impl Into<OsString>) -> Self {
        Self {
            search_paths: Some(search_paths.into()),
        }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let search_paths = match &self.search_paths {
            Some(paths) => paths.clone(),
            None => std::env::var_os("PATH").unwrap_or_default(),
        };
        find_command_path(&search_paths, Path::new(name))
            .map(Cow::into_owned)
            .ok_or_else(|| anyhow!("{}: command not found", name))
    }

    fn spawn_and_wait(&self, argv: &[&str], stdin: Stdio, stdout: Stdio) -> Result<ExitCode> {
        let (name, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("no program to launch"))?;
        let program = self.resolve(name)?;
        debug!("launching {} as {:?}", program.display(), argv);

        let mut command = Command::new(&program);
        command.args(args).stdin(stdin).stdout(stdout);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(name);
        }

        let mut child = command.spawn().with_context(|| name.to_string())?;
        let exit_status = child
            .wait()
            .with_context(|| format!("{}: wait failed", name))?;
        let code = match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        };
        debug!("{} (pid {}) exited with {}", name, child.id(), code);
        Ok(code)
    }
}

impl Launcher for ProcessLauncher {
    fn launch_plain(&mut self, argv: &[&str]) -> Result<ExitCode> {
        self.spawn_and_wait(argv, Stdio::inherit(), Stdio::inherit())
    }

    fn launch_redirected(&mut self, argv: &[&str], redirection: &Redirection) -> Result<ExitCode> {
        // Files are opened before the child exists; a failure here means no
        // process is created at all.
        let stdin = redirection.stdin()?;
        let stdout = redirection.stdout()?;
        self.spawn_and_wait(argv, stdin, stdout)
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
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
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Any path containing a separator (`/bin/sh`, `./foo`, `bin/sh`) is used
///   as is, relative to the current directory, if it names an executable file.
/// - Single path component: search each directory in `search_paths` (PATH)
///   in order and return the first executable match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(std::path::Component::Normal(name)), None) => {
            find_in_path(search_paths, name).map(Cow::Owned)
        }
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
