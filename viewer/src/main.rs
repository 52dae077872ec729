use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use viewer::{driver::Driver, Cli, Config, Source};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    // usage errors exit cleanly, same as --help
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            _ = err.print();
            return ExitCode::SUCCESS;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> viewer::Result<()> {
    let config = Config::from_cli(cli);
    let source = Source::resolve(cli.file.as_deref())?;
    let size = source.size()?;
    tracing::debug!("Using {} ({size} bytes, {:?})", source.describe(), source.format());

    let event_loop = EventLoop::new()?;
    let driver = Driver::create(&event_loop, &config, source)?;
    driver.run(event_loop)
}
