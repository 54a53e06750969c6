mod report;
mod run;
mod summary;

use std::path::Path;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vitrina_store::DataPaths;

const CHARTS_DIR: &str = "charts";

#[derive(Debug, Parser)]
#[command(name = "vitrina")]
#[command(about = "Scrape car listings and campaign offers into CSV tables and charts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every listing, write the tables under data/ and render charts
    /// (the default when no subcommand is given).
    Run(RunArgs),
    /// Re-render charts from tables written by a previous run.
    Report,
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    /// Oldest model year for the used-car search (overrides VITRINA_MIN_YEAR).
    #[arg(long)]
    min_year: Option<u16>,
    /// Skip the new and used car listings.
    #[arg(long)]
    skip_cars: bool,
    /// Skip the campaign listing.
    #[arg(long)]
    skip_campaigns: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut config = vitrina_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let paths = DataPaths::default();
    let charts_dir = Path::new(CHARTS_DIR);

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            if let Some(year) = args.min_year {
                config.min_year = year;
            }
            let options = run::RunOptions {
                cars: !args.skip_cars,
                campaigns: !args.skip_campaigns,
            };
            let summary = run::run_scrape(&config, options, &paths, charts_dir).await?;
            println!("{summary}");
        }
        Commands::Report => {
            let charts = report::run_report(&paths, charts_dir)?;
            for chart in charts {
                println!("{}", chart.display());
            }
        }
    }

    Ok(())
}
