use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("newsmill=debug")
    } else {
        EnvFilter::new("newsmill=warn")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args),
        Commands::Locations(args) => cli::list::locations(args),
        Commands::Languages => cli::list::languages(),
        Commands::Schema => cli::schema::execute(),
    }
}
