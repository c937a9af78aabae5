use std::sync::Arc;

use clap::Parser;
use huddle_api::Session;

use utils::{command_error::Error, display::print_signals, exit_code::ExitCode, session_file::SessionFile};

mod commands;
mod tracing;

mod utils {
    pub mod command_error;
    pub mod display;
    pub mod exit_code;
    pub mod session_file;
    pub mod time;
}

#[derive(Parser, Debug)]
#[command(
    name = "huddle",
    version,
    long_about = Some("Browse, host and join activities from the terminal.")
)]
struct Args {
    /// Path of the configuration file, defaults to `<config dir>/huddle/config.toml`
    #[clap(long, global = true)]
    config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::Success,
        Err(Error::ExitWithError(code, report)) => {
            eprintln!("Error: {report:?}");
            code
        }
        Err(Error::Exit(code)) => code,
    }
}

async fn run() -> utils::command_error::Result<()> {
    color_eyre::install()?;
    tracing::setup()?;

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => huddle_config::default_config_path()?,
    };
    let config = huddle_config::load_or_default(&config_path)
        .map_err(|e| Error::ExitWithError(ExitCode::ConfigError, e))?;

    let session_file = SessionFile::default_location()?;
    let session = match session_file.load()? {
        Some(token) => Session::with_token(token),
        None => Session::new(),
    };

    let core = huddle_core::load(&config, Arc::new(session))
        .map_err(|e| Error::ExitWithError(ExitCode::ConfigError, e))?;
    let signals = core.subscribe_signals();

    core.initialize().await;
    if core.session().token().await.is_none() {
        // the stored token was rejected
        session_file.clear()?;
    }

    let result = args.command.execute(&core, &session_file).await;
    print_signals(signals.drain());

    result
}
