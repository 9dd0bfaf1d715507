use cmdsh::config::Args;
use cmdsh::{Config, Interpreter, PROGRAM_NAME};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let config = Config::from(argh::from_env::<Args>());

    match Interpreter::default().repl(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {}", PROGRAM_NAME, err);
            ExitCode::FAILURE
        }
    }
}
