use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

mod export;
mod output;
mod search;

#[derive(Debug, Parser)]
#[command(name = "chineur")]
#[command(about = "Bargain scanner for leboncoin classified ads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one collection pass over the given queries and print the results
    Search(SearchArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Search queries; one run collects all of them
    #[arg(required = true)]
    queries: Vec<String>,

    /// Location filter forwarded to the origin (city or region name)
    #[arg(long)]
    location: Option<String>,

    /// Keep only listings within this distance of --location (km)
    #[arg(long)]
    radius_km: Option<f64>,

    /// Pages to fetch per query
    #[arg(long, default_value_t = 2)]
    pages: u32,

    /// Lower price bound in EUR, forwarded to the origin
    #[arg(long)]
    min_price: Option<u32>,

    /// Upper price bound in EUR, forwarded to the origin
    #[arg(long)]
    max_price: Option<u32>,

    /// Retrieval strategy
    #[arg(long, value_enum, default_value_t = Mode::Simple)]
    mode: Mode,

    /// Milliseconds between requests (overrides CHINEUR_THROTTLE_MS)
    #[arg(long)]
    throttle_ms: Option<u64>,

    /// Detect attributes and estimate a resale margin per listing
    #[arg(long)]
    valuate: bool,

    /// Assumed negotiation discount in percent
    #[arg(long, default_value_t = 10.0)]
    negotiation_pct: f64,

    /// Assumed dismantle resale bonus in percent
    #[arg(long, default_value_t = 20.0)]
    dismantle_bonus_pct: f64,

    /// Attribute rules file (overrides CHINEUR_PATTERNS_PATH)
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Write the final listings to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Plain HTTP fetch, fast but often served incomplete pages
    Simple,
    /// Full browser rendering through a WebDriver endpoint
    Browser,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => search::run_search(args).await,
    }
}
