//! `flavor-migrate`: convert legacy flavor parts to the PCR log format.

mod cli;
mod commands;
mod config;
mod library;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str =
    "flavor_migrate=info,flavor_migrate_kernel=info,flavor_migrate_schema=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            template_dir,
            output,
            config,
            no_write,
            quiet,
        } => commands::convert::run(commands::convert::Args {
            input,
            template_dir,
            output,
            config,
            no_write,
            quiet,
        }),

        Commands::Conditions { json } => commands::conditions::run(json),
    }
}
