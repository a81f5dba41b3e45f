use clap::{ArgAction, Parser, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// CLI arguments for the ttcn binary.
#[derive(Parser, Debug)]
#[command(
    name = "ttcn",
    version,
    about = "Parse, bind and cross-reference TTCN-3 modules"
)]
pub struct CliArgs {
    /// Files or directories to check. Directories are searched recursively.
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Path to ttcn.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to color text output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print the files that would be checked and stop.
    #[arg(long = "list-files", alias = "listFiles")]
    pub list_files: bool,

    /// Print the top-level symbols of every module.
    #[arg(long)]
    pub symbols: bool,

    /// Log to stderr: `-v` for debug events, `-vv` for trace.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Layout of log events on stderr.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    /// Indented by span nesting.
    Tree,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve `auto` against the terminal and `NO_COLOR`.
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}
