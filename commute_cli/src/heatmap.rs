use std::{io::Write, path::PathBuf, time::Duration};

use clap::Args;
use commute_analysis::{
    analysis::{AnalysisError, AnalysisParams, run_analysis},
    batch::{BatchError, BatchParams},
    borough::{BoroughSource, DEFAULT_BOROUGH, NYC_BOROUGHS_URL, load_borough},
    office::{DEFAULT_ROOMMATES, OfficeRegistry},
    renderer::{DEFAULT_SIZE, HeatmapScene, render_svg_file},
    sampler::SamplerParams,
};
use commute_maps::{
    maps_client::{GoogleMapsClient, MapsClientParams},
    travel_mode::{TransitMode, TravelMode},
};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::SmallRng};
use tracing::{info, warn};

use crate::parsers;

#[derive(Args)]
pub struct HeatmapArgs {
    /// Roommate whose office is a commute origin, repeat for several
    #[arg(short, long = "roommate", default_values_t = DEFAULT_ROOMMATES.map(String::from))]
    roommates: Vec<String>,

    /// Number of sampled points
    #[arg(short = 'n', long, default_value_t = 1000)]
    total: usize,

    /// Points per distance matrix request
    #[arg(short, long, default_value_t = 20)]
    batch_size: usize,

    #[arg(long, default_value_t = TravelMode::Transit)]
    mode: TravelMode,

    /// Only used with the transit mode
    #[arg(long, default_value_t = TransitMode::Subway)]
    transit_mode: TransitMode,

    /// Borough boundaries GeoJSON, a path or an http(s) URL
    #[arg(long, default_value = NYC_BOROUGHS_URL)]
    boroughs: BoroughSource,

    #[arg(long, default_value = DEFAULT_BOROUGH)]
    borough: String,

    #[arg(long, default_value_t = SamplerParams::default().max_attempts_per_point)]
    max_attempts_per_point: usize,

    /// Seed of the point sampler, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// HTTP request timeout (e.g., "30s", "PT1M"), none by default. Applies to
    /// the Maps API calls and the borough download
    #[arg(long, value_parser = parsers::parse_timeout)]
    timeout: Option<Duration>,

    /// Output SVG file
    #[arg(short, long, default_value = "commute_heatmap.svg")]
    out: PathBuf,
}

fn progress_bar(batches: usize) -> ProgressBar {
    let bar = ProgressBar::new(batches as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} batches ({msg})")
    {
        bar.set_style(style);
    }
    bar
}

/// A malformed distance matrix response is printed as received before the
/// run fails.
fn report_analysis_error(error: AnalysisError, out: &mut impl Write) -> anyhow::Error {
    match error {
        AnalysisError::Batch(BatchError::MalformedResponse { source, response }) => {
            if let Err(write_error) =
                writeln!(out, "Error in request. Response from Maps API: {response}")
            {
                warn!("Failed to print the response: {}", write_error);
            }
            anyhow::Error::new(source).context("Malformed distance matrix response")
        }
        error => error.into(),
    }
}

pub async fn run(args: HeatmapArgs) -> anyhow::Result<()> {
    let client = GoogleMapsClient::new(MapsClientParams::from_env()?.with_timeout(args.timeout))?;
    let area = load_borough(&args.boroughs, &args.borough, args.timeout).await?;

    let params = AnalysisParams {
        roommates: args.roommates,
        total: args.total,
        batch_size: args.batch_size,
        batch: BatchParams {
            mode: args.mode,
            transit_mode: args.transit_mode,
        },
        sampler: SamplerParams {
            max_attempts_per_point: args.max_attempts_per_point,
        },
    };

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let bar = progress_bar(params.total.div_ceil(params.batch_size.max(1)));
    let result = run_analysis(
        &client,
        &OfficeRegistry::default(),
        &area,
        &params,
        &mut rng,
        |_, accumulator| {
            bar.inc(1);
            bar.set_message(format!("{} points", accumulator.len()));
        },
    )
    .await;
    bar.finish_and_clear();

    let analysis = result.map_err(|error| report_analysis_error(error, &mut std::io::stdout()))?;

    info!(
        "Collected {} points for {} offices",
        analysis.accumulator.len(),
        analysis.offices.len()
    );

    render_svg_file(
        &args.out,
        DEFAULT_SIZE,
        &HeatmapScene {
            area: &area,
            accumulator: &analysis.accumulator,
            offices: &analysis.office_locations,
        },
    )?;

    Ok(())
}
