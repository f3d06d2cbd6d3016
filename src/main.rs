mod accounts;
mod artifacts;
mod charts;
mod cli;
mod columns;
mod compliance;
mod dataset;
mod error;
mod fmt;
mod holdings;
mod narrative;
mod pipeline;
mod report;
mod risk;
mod settings;
mod tax;
mod transactions;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            file,
            output,
            user,
            settings,
            no_narrative,
        } => cli::analyze::run(
            &file,
            &output,
            user.as_deref(),
            settings.as_deref(),
            no_narrative,
        ),
        Commands::Inspect { file, user } => cli::inspect::run(&file, user.as_deref()),
        Commands::Demo { output } => cli::demo::run(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
