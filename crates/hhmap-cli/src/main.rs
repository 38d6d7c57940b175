mod import;
mod query;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "hhmap-cli")]
#[command(about = "Happy hour map command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import venues from a JSON file into the store
    Import {
        /// Path to a JSON array of venue records
        file: PathBuf,

        /// Parse and report without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// List venues ranked by distance from a point
    Nearby {
        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lng: f64,

        /// Maximum venues to print
        #[arg(long)]
        limit: Option<i64>,

        /// Only venues with a happy hour window covering the current time
        #[arg(long)]
        open_now: bool,
    },
    /// Print a venue's consolidated schedule and curated deals
    Schedule {
        /// Venue id
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let pool = hhmap_db::connect_pool_from_env().await?;
    hhmap_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Import { file, dry_run } => import::run_import(&pool, &file, dry_run).await,
        Commands::Nearby {
            lat,
            lng,
            limit,
            open_now,
        } => query::run_nearby(&pool, lat, lng, limit, open_now).await,
        Commands::Schedule { id } => query::run_schedule(&pool, id).await,
    }
}
