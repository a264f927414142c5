//! CLI definition using clap

use clap::{Parser, Subcommand};
use fleetview_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetview")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Filtered distributions, trends and frames over a vehicle fleet dataset")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// ZIP gazetteer CSV (zip,latitude,longitude). Uses config value if not specified.
    #[arg(long, global = true)]
    pub zip_table: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a dataset and report accepted/rejected rows
    Ingest {
        /// Fleet dataset CSV. Uses config value if not specified.
        dataset: Option<PathBuf>,

        /// List every rejected row with its reasons
        #[arg(long)]
        show_rejected: bool,
    },

    /// List the distinct values of a field (filter options)
    Options {
        /// Fleet dataset CSV. Uses config value if not specified.
        dataset: Option<PathBuf>,

        /// Field name (make, type, fuel-source, city, state, status, model-year, ...)
        #[arg(long)]
        field: String,
    },

    /// Compute views over the filtered dataset
    Query {
        /// Fleet dataset CSV. Uses config value if not specified.
        dataset: Option<PathBuf>,

        /// Filter as field=value[,value...] (e.g., "make=Toyota,Honda"). Repeatable.
        #[arg(long = "filter", short = 'F')]
        filters: Vec<String>,

        /// JSON file mapping field names to accepted values
        #[arg(long)]
        selection: Option<PathBuf>,

        /// View to compute. Repeatable. All views if not specified.
        #[arg(long = "view", short = 'w')]
        views: Vec<String>,

        /// Make collapsing threshold (0.0-1.0). Uses config value if not specified.
        #[arg(long)]
        threshold: Option<f64>,

        /// Geocoding threads. 0 = auto (CPU count). Uses config value if not specified.
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default dataset path
        #[arg(long)]
        set_dataset: Option<PathBuf>,

        /// Set ZIP gazetteer path
        #[arg(long)]
        set_zip_table: Option<PathBuf>,

        /// Set make collapsing threshold (0.0-1.0)
        #[arg(long)]
        set_threshold: Option<f64>,

        /// Set geocoding threads (0 = auto)
        #[arg(long)]
        set_jobs: Option<usize>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}
