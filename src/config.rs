use argh::FromArgs;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "cmdsh> ";
pub const DEFAULT_MAX_HISTORY: usize = 1000;

#[derive(FromArgs, Debug)]
/// A small interactive command interpreter.
pub struct Args {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text shown before each input line
    pub prompt: String,

    #[argh(option)]
    /// file to load line history from and save it to on exit
    pub history_file: Option<PathBuf>,

    #[argh(option, default = "DEFAULT_MAX_HISTORY")]
    /// maximum number of history entries kept in memory
    pub max_history: usize,
}

/// Settings of one interactive session.
#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    pub history_file: Option<PathBuf>,
    pub max_history: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: None,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            prompt: args.prompt,
            history_file: args.history_file,
            max_history: args.max_history,
        }
    }
}

impl Config {
    /// Line editor settings for this session.
    pub fn line_editor_config(&self) -> rustyline::Result<rustyline::Config> {
        Ok(rustyline::Config::builder()
            .auto_add_history(true)
            .max_history_size(self.max_history)?
            .history_ignore_space(true)
            .build())
    }
}
