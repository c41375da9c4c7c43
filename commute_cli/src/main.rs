use clap::{Parser, Subcommand};

use mimalloc::MiMalloc;

use crate::{geocode::GeocodeArgs, heatmap::HeatmapArgs};

mod geocode;
mod heatmap;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample points in the borough and plot average and variance of the
    /// commute time to the roommates offices
    Heatmap {
        #[command(flatten)]
        args: HeatmapArgs,
    },
    /// Print the coordinates of the roommates offices
    #[command(visible_alias = "g")]
    Geocode {
        #[command(flatten)]
        args: GeocodeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Heatmap { args } => heatmap::run(args).await?,
        Commands::Geocode { args } => geocode::run(args).await?,
    }

    Ok(())
}
