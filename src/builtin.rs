use crate::command::Continuation;
use anyhow::{Context, Result, anyhow};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    const NAME: &'static str;

    /// Executes the command, writing any regular output to `stdout`.
    fn execute(self, stdout: &mut dyn Write) -> Result<Continuation>;
}

/// The fixed set of built-ins, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Path,
    Exit,
}

impl Builtin {
    pub const ALL: [Builtin; 3] = [Builtin::Cd, Builtin::Path, Builtin::Exit];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => Cd::NAME,
            Builtin::Path => PrintPath::NAME,
            Builtin::Exit => Exit::NAME,
        }
    }

    /// Exact, case-sensitive lookup of a built-in by command name.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    /// Parses `args` (everything after the command name) and runs the built-in.
    ///
    /// Usage and OS errors are returned; the caller decides how to report them.
    pub fn run(self, args: &[&str], stdout: &mut dyn Write) -> Result<Continuation> {
        match self {
            Builtin::Cd => invoke::<Cd>(args, stdout),
            Builtin::Path => invoke::<PrintPath>(args, stdout),
            Builtin::Exit => invoke::<Exit>(args, stdout),
        }
    }
}

fn invoke<T: BuiltinCommand>(args: &[&str], stdout: &mut dyn Write) -> Result<Continuation> {
    match T::from_args(&[T::NAME], args) {
        Ok(cmd) => cmd.execute(stdout),
        Err(EarlyExit { output, status }) => match status {
            // --help
            Ok(()) => {
                stdout.write_all(output.as_bytes())?;
                Ok(Continuation::Continue)
            }
            Err(()) => {
                let first_line = output.lines().next().unwrap_or("invalid arguments");
                Err(anyhow!("{}: {}", T::NAME, first_line))
            }
        },
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    const NAME: &'static str = "cd";

    fn execute(self, _stdout: &mut dyn Write) -> Result<Continuation> {
        let target = match self.target {
            Some(t) => t,
            None => return Err(anyhow!("expected argument to \"cd\"")),
        };
        env::set_current_dir(&target).with_context(|| format!("cd: {}", target))?;
        Ok(Continuation::Continue)
    }
}

#[derive(FromArgs)]
/// Print the current working directory.
pub struct PrintPath {}

impl BuiltinCommand for PrintPath {
    const NAME: &'static str = "path";

    fn execute(self, stdout: &mut dyn Write) -> Result<Continuation> {
        let cwd = env::current_dir().context("path: cannot read current directory")?;
        writeln!(stdout, "PATH: {}", cwd.display())?;
        Ok(Continuation::Continue)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";

    fn execute(self, _stdout: &mut dyn Write) -> Result<Continuation> {
        Ok(Continuation::Terminate)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serialises tests that read or change the process working directory.
    pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(Builtin::lookup("cd"), Some(Builtin::Cd));
        assert_eq!(Builtin::lookup("path"), Some(Builtin::Path));
        assert_eq!(Builtin::lookup("exit"), Some(Builtin::Exit));
        assert_eq!(Builtin::lookup("CD"), None);
        assert_eq!(Builtin::lookup("exit "), None);
        assert_eq!(Builtin::lookup("pwd"), None);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in Builtin::ALL.iter().enumerate() {
            for b in &Builtin::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_path_prints_current_dir() {
        let _lock = lock_current_dir();
        let cur = env::current_dir().unwrap();

        let mut out = Vec::new();
        let res = Builtin::Path.run(&[], &mut out).unwrap();

        assert_eq!(res, Continuation::Continue);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("PATH: {}\n", cur.display())
        );
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = tempfile::tempdir().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        let orig = env::current_dir().unwrap();

        let target = canonical_temp.to_string_lossy().to_string();
        let res = Builtin::Cd.run(&[&target], &mut Vec::new());
        let new_cwd = fs::canonicalize(env::current_dir().unwrap()).unwrap();
        env::set_current_dir(&orig).expect("failed to restore cwd");

        assert_eq!(res.unwrap(), Continuation::Continue);
        assert_eq!(new_cwd, canonical_temp);
    }

    #[test]
    fn test_cd_without_target_is_usage_error() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let err = Builtin::Cd.run(&[], &mut Vec::new()).unwrap_err();

        assert_eq!(err.to_string(), "expected argument to \"cd\"");
        assert_eq!(env::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_cd_nonexistent_path_errors() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let err = Builtin::Cd
            .run(&["/nonexistent-path-for-cmdsh-tests"], &mut Vec::new())
            .unwrap_err();

        assert!(
            format!("{:#}", err).starts_with("cd: /nonexistent-path-for-cmdsh-tests: "),
            "{:#}",
            err
        );
        assert_eq!(env::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_cd_extra_argument_is_usage_error() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let err = Builtin::Cd.run(&["/", "/tmp"], &mut Vec::new()).unwrap_err();

        assert!(err.to_string().starts_with("cd: "), "{}", err);
        assert!(!err.to_string().contains('\n'));
        assert_eq!(env::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_exit_terminates_with_or_without_args() {
        assert_eq!(
            Builtin::Exit.run(&[], &mut Vec::new()).unwrap(),
            Continuation::Terminate
        );
        assert_eq!(
            Builtin::Exit.run(&["now"], &mut Vec::new()).unwrap(),
            Continuation::Terminate
        );
        assert_eq!(
            Builtin::Exit.run(&["now", "please"], &mut Vec::new()).unwrap(),
            Continuation::Terminate
        );
    }

    #[test]
    fn test_help_goes_to_stdout_and_continues() {
        let mut out = Vec::new();
        let res = Builtin::Path.run(&["--help"], &mut out).unwrap();

        assert_eq!(res, Continuation::Continue);
        assert!(String::from_utf8(out).unwrap().contains("Usage: path"));
    }
}
