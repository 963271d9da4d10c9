use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Flood-risk rating CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "floodrater", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rate a portfolio against flood-zone layers and compute PML
    Analyze(AnalyzeArgs),

    /// Print diagnostics for one or more zone bundles
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input portfolio CSV
    #[arg(value_hint = ValueHint::FilePath)]
    pub portfolio: PathBuf,

    /// Zone layers: zipped shapefile bundles or bare .shp files, in precedence order
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    pub zones: Vec<PathBuf>,

    /// Output directory for the enriched export and summary tables
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Keep only policies expiring strictly after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub inforce_after: Option<NaiveDate>,

    /// JSON file overriding the built-in rate table
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub rates: Option<PathBuf>,

    /// Also write the enriched portfolio as XLSX
    #[arg(long)]
    pub xlsx: bool,

    /// Overwrite an existing enriched export (off by default)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Zone layers: zipped shapefile bundles or bare .shp files
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    pub zones: Vec<PathBuf>,
}
