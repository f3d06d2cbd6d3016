pub mod analyze;
pub mod demo;
pub mod inspect;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "wealthsnap",
    about = "Derive a client financial snapshot report from a tabular export."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze an export and write the report artifact set.
    Analyze {
        /// Path to the CSV export
        file: String,
        /// Output directory for artifacts
        #[arg(long, default_value = "./output")]
        output: String,
        /// Subject identifier to filter rows to (profile__user_id)
        #[arg(long)]
        user: Option<String>,
        /// Settings JSON path (default: ~/.config/wealthsnap/settings.json)
        #[arg(long)]
        settings: Option<String>,
        /// Skip the narrative service and use the local summary
        #[arg(long = "no-narrative")]
        no_narrative: bool,
    },
    /// Show which semantic column roles resolve for each concern.
    Inspect {
        /// Path to the CSV export
        file: String,
        /// Subject identifier to filter rows to (profile__user_id)
        #[arg(long)]
        user: Option<String>,
    },
    /// Write a synthetic sample export to explore wealthsnap.
    Demo {
        /// Output CSV path
        #[arg(long, default_value = "sample_export.csv")]
        output: String,
    },
}
