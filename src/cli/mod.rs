pub mod generate;
pub mod list;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use newsmill::config::PlannerKind;

#[derive(Parser)]
#[command(name = "newsmill")]
#[command(
    author,
    version,
    about = "Template-based multilingual news generation from tabular statistics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a news article for a location
    Generate(GenerateArgs),

    /// List locations available in a dataset
    Locations(LocationsArgs),

    /// List languages with a registered template set
    Languages,

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct GenerateArgs {
    /// Target language
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Location to report on (country code, or "all")
    #[arg(long)]
    pub location: String,

    /// Location type tag carried on extracted facts
    #[arg(long, default_value = "C")]
    pub location_type: String,

    /// Document planning strategy
    #[arg(long, default_value = "full")]
    pub planner: PlannerKind,

    /// PRNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dataset rows as a JSON file (built-in sample when omitted)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit the article as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct LocationsArgs {
    /// Dataset rows as a JSON file (built-in sample when omitted)
    #[arg(long)]
    pub data: Option<PathBuf>,
}
