//! A terminal multiplexer.
//!
//! Wires together the CLI, logging, global state, and the event loop, and
//! translates any startup failure into a non-zero exit code.

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use smtx::app::App;
use smtx::error::{Error, Result};
use smtx::{cli, render};

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("smtx: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    let log_file = std::fs::File::create(&cli.log_file).map_err(Error::Io)?;
    WriteLogger::init(LevelFilter::Info, Config::default(), log_file).map_err(|e| Error::Startup(e.to_string()))?;
    log::info!("smtx starting up");

    let (cols, rows) = crossterm::terminal::size().map_err(Error::Io)?;

    let mut app = App::new(cli.command_byte(), cli.width, cli.history, cli.term_value(), rows, cols);
    app.bootstrap()?;

    let _guard = render::TerminalGuard::enter()?;
    let result = app.run();

    log::info!("smtx shutting down");
    result
}
