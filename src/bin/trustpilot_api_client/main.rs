//! trustpilot_api_client - send authenticated requests to the Trustpilot API.
//!
//! A thin wrapper over the `trustpilot` library: flags, config files and
//! output formatting live here, authentication lives in the session.

mod cli;
mod output;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trustpilot::Method;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let values = settings::load_values(cli.config.as_deref(), cli.env.as_deref())?;
    let options = settings::session_options(&cli, &values)?;

    let session = trustpilot::init_default_session(options)?;

    let response = match &cli.command {
        Commands::CreateAccessToken => {
            let token = session.authenticate()?;
            println!("{}", token);
            return Ok(());
        }
        Commands::Get { path } => session.get(path)?,
        Commands::Delete { path } => session.delete(path)?,
        Commands::Post(args) => session.send(args.request(Method::POST)?)?,
        Commands::Put(args) => session.send(args.request(Method::PUT)?)?,
        Commands::Patch(args) => session.send(args.request(Method::PATCH)?)?,
    };

    println!("{}", output::format_response(&response, cli.outputformat, cli.verbose)?);
    Ok(())
}

/// -v only adds headers to the output; -vv and up turn on logging.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 | 1 => "error",
        2 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
