mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prospect")]
#[command(about = "Find local businesses and audit their web presence")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover businesses for a keyword and location, audit them, export CSV
    Search {
        /// Business type to look for (e.g., Boulangerie)
        #[arg(long)]
        keyword: String,
        /// City or area to search in (e.g., Lyon)
        #[arg(long)]
        location: String,
        /// Directory the CSV export is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Leads analysed concurrently per group (overrides `PROSPECT_BATCH_SIZE`)
        #[arg(long)]
        batch_size: Option<usize>,
        /// Print the final lead list as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration (API key redacted)
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("prospect: no command given, try `prospect --help`");
        return Ok(());
    };

    let config = prospect_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Search {
            keyword,
            location,
            out_dir,
            batch_size,
            json,
        } => {
            let args = search::SearchArgs {
                keyword,
                location,
                out_dir,
                batch_size,
                json,
            };
            search::run_search(&config, &args).await?;
        }
        Commands::Config => println!("{config:#?}"),
    }

    Ok(())
}
