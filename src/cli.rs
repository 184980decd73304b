use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hydrostore observation store tool.
#[derive(Parser)]
#[command(
    name = "hydrostore",
    version,
    about = "Inspect and reorganise stores of hydrological observations"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// List the metadata records of a store.
    Inventory(InventoryArgs),
    /// Load a collection from a store and write its summary table.
    Summary(SummaryArgs),
    /// Copy a store into another one, grouping items into collections.
    Regroup(RegroupArgs),
    /// Export a store into a pastastore library and dump its series.
    Pastas(PastasArgs),
}

/// Store selection shared by all subcommands.
#[derive(clap::Args)]
pub struct StoreArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the store root directory from config.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Override the store name from config.
    #[arg(short, long)]
    pub store: Option<String>,
}

/// Arguments for the `inventory` subcommand.
#[derive(clap::Args)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only list items inside this extent.
    #[arg(long, num_args = 4, value_names = ["XMIN", "XMAX", "YMIN", "YMAX"], allow_negative_numbers = true)]
    pub extent: Option<Vec<f64>>,

    /// Path for JSON output (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `summary` subcommand.
#[derive(clap::Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only load these items (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub items: Option<Vec<String>>,

    /// Only load items inside this extent.
    #[arg(long, num_args = 4, value_names = ["XMIN", "XMAX", "YMIN", "YMAX"], allow_negative_numbers = true)]
    pub extent: Option<Vec<f64>>,

    /// Skip data files and summarise metadata only.
    #[arg(long)]
    pub metadata_only: bool,

    /// Path for JSON output (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `regroup` subcommand.
#[derive(clap::Args)]
pub struct RegroupArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Name of the store to write into (same root).
    #[arg(short, long)]
    pub target: String,

    /// Override the metadata key used to pick collections.
    #[arg(short, long)]
    pub group_by: Option<String>,

    /// Replace items that already exist in the target store.
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the `pastas` subcommand.
#[derive(clap::Args)]
pub struct PastasArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Override the value column exported from each observation.
    #[arg(long)]
    pub obs_column: Option<String>,

    /// Add series as stresses of this kind instead of oseries.
    #[arg(long)]
    pub stress: Option<String>,

    /// Path for JSON output (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
