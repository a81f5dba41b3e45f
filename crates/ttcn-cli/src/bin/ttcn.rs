use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use ttcn_cli::args::CliArgs;
use ttcn_cli::driver;
use ttcn_cli::tracing_config::LogSettings;

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    LogSettings::from_args(&args)
        .install()
        .context("failed to set up logging")?;
    let cwd = std::env::current_dir().context("failed to read the current directory")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let failed = driver::run(&args, &cwd, &mut out)?;
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
