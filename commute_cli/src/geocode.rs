use clap::Args;
use commute_analysis::office::OfficeRegistry;
use commute_maps::{
    geocoding_api::Geocoder,
    maps_client::{GoogleMapsClient, MapsClientParams},
};

#[derive(Args)]
pub struct GeocodeArgs {
    /// Roommate names, every known office when omitted
    roommates: Vec<String>,
}

/// Prints `name<TAB>longitude<TAB>latitude<TAB>address` for each office.
pub async fn run(args: GeocodeArgs) -> anyhow::Result<()> {
    let client = GoogleMapsClient::new(MapsClientParams::from_env()?)?;
    let registry = OfficeRegistry::default();

    let offices = if args.roommates.is_empty() {
        registry.offices().to_vec()
    } else {
        registry.resolve(&args.roommates)?
    };

    for office in offices {
        let location = client.geocode(&office.address).await?;
        println!(
            "{}\t{:.6}\t{:.6}\t{}",
            office.name,
            location.x(),
            location.y(),
            office.address
        );
    }

    Ok(())
}
