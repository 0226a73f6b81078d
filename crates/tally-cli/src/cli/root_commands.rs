use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use tally_core::enums::SortDirection;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Check whether the server holds any sales data.
    Probe,
    /// Load rows page by page and print them.
    Browse(BrowseArgs),
    /// Interactive feed driven by commands on stdin.
    Watch(WatchArgs),
    /// Import a CSV file.
    Upload(UploadArgs),
    /// Print the JSON Schema of a wire type.
    Schema(SchemaArgs),
}

/// Filter inputs shared by `browse`.
#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    /// Free-text search over country, region, and item type
    #[arg(long)]
    pub q: Option<String>,

    /// Exact country
    #[arg(long)]
    pub country: Option<String>,

    /// Exact item type
    #[arg(long)]
    pub item_type: Option<String>,

    /// Earliest order date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest order date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Sort by order date: asc or desc
    #[arg(long, default_value = "desc")]
    pub sort: SortDirection,

    /// Stop once this many rows are loaded
    #[arg(short, long, default_value_t = 100)]
    pub limit: usize,

    /// Skip the existence probe and fetch directly
    #[arg(long)]
    pub skip_probe: bool,
}

#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    /// Height of one rendered row
    #[arg(long, default_value_t = 32.0)]
    pub row_height: f64,

    /// Height of the viewport
    #[arg(long, default_value_t = 600.0)]
    pub viewport: f64,

    /// Skip the existence probe and fetch directly
    #[arg(long)]
    pub skip_probe: bool,
}

#[derive(Clone, Debug, Args)]
pub struct UploadArgs {
    /// CSV file to import
    pub path: PathBuf,

    /// Source label stored with the rows (defaults to the file name)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Overwrite rows whose order id already exists
    #[arg(long)]
    pub upsert: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Page,
    Filter,
    ImportResult,
    Record,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Wire type to describe
    pub type_name: SchemaType,
}
