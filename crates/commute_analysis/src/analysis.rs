use commute_maps::{
    distance_matrix_api::DistanceMatrixSource, geocoding_api::Geocoder, maps_error::MapsError,
};
use geo::{MultiPolygon, Point};
use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::{
    accumulator::CommuteAccumulator,
    batch::{BatchAggregator, BatchError, BatchParams, BatchPlan, PlanError},
    office::{Office, OfficeRegistry, UnknownOfficeError},
    sampler::{RejectionSampler, SamplerParams},
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    UnknownOffice(#[from] UnknownOfficeError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Failed to geocode the office of {name}: {source}")]
    Geocode { name: String, source: MapsError },
}

#[derive(Debug, Clone)]
pub struct AnalysisParams {
    pub roommates: Vec<String>,
    pub total: usize,
    pub batch_size: usize,
    pub batch: BatchParams,
    pub sampler: SamplerParams,
}

pub struct CommuteAnalysis {
    pub offices: Vec<Office>,
    /// Same order as `offices`
    pub office_locations: Vec<Point>,
    pub accumulator: CommuteAccumulator,
}

/// Resolves the roommates offices, samples `total` destinations in the area
/// batch by batch, then geocodes the offices for the plots.
pub async fn run_analysis<C, R, F>(
    client: &C,
    registry: &OfficeRegistry,
    area: &MultiPolygon,
    params: &AnalysisParams,
    rng: &mut R,
    on_batch: F,
) -> Result<CommuteAnalysis, AnalysisError>
where
    C: Geocoder + DistanceMatrixSource,
    R: Rng,
    F: FnMut(usize, &CommuteAccumulator),
{
    let offices = registry.resolve(&params.roommates)?;
    let plan = BatchPlan::new(params.total, params.batch_size, offices.len())?;

    info!(
        "Sampling {} points in {} batches for {}",
        plan.total(),
        plan.num_batches(),
        params.roommates.join(", ")
    );

    let aggregator = BatchAggregator::new(
        client,
        offices.iter().map(|office| office.address.clone()).collect(),
        area,
        RejectionSampler::new(params.sampler),
        params.batch,
    );
    let accumulator = aggregator.run_plan(&plan, rng, on_batch).await?;

    let mut office_locations = Vec::with_capacity(offices.len());
    for office in &offices {
        let location = client
            .geocode(&office.address)
            .await
            .map_err(|source| AnalysisError::Geocode {
                name: office.name.clone(),
                source,
            })?;
        office_locations.push(location);
    }

    Ok(CommuteAnalysis {
        offices,
        office_locations,
        accumulator,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use commute_maps::distance_matrix_api::DistanceMatrixRequest;
    use geo::polygon;
    use rand::{SeedableRng, rngs::SmallRng};
    use serde_json::json;

    use super::*;
    use crate::renderer::{DEFAULT_SIZE, HeatmapScene, render_svg_string};

    /// Every origin is `10 * (origin + 1)` minutes away from every destination.
    #[derive(Default)]
    struct FakeMaps {
        matrix_requests: Cell<usize>,
        geocode_requests: Cell<usize>,
        malformed: bool,
    }

    impl Geocoder for FakeMaps {
        async fn geocode(&self, address: &str) -> Result<Point, MapsError> {
            self.geocode_requests.set(self.geocode_requests.get() + 1);
            match address {
                "A St" => Ok(Point::new(-74.0, 40.71)),
                "B Ave" => Ok(Point::new(-73.95, 40.8)),
                _ => Err(MapsError::NoResults {
                    address: address.to_string(),
                    status: String::from("ZERO_RESULTS"),
                    message: None,
                }),
            }
        }
    }

    impl DistanceMatrixSource for FakeMaps {
        async fn fetch_distance_matrix(
            &self,
            request: &DistanceMatrixRequest,
        ) -> Result<serde_json::Value, MapsError> {
            self.matrix_requests.set(self.matrix_requests.get() + 1);
            if self.malformed {
                return Ok(json!({ "status": "OVER_QUERY_LIMIT" }));
            }

            let rows = (0..request.origins.len())
                .map(|origin| {
                    let seconds = 600 * (origin + 1);
                    json!({
                        "elements": vec![
                            json!({ "duration": { "value": seconds }, "status": "OK" });
                            request.destinations.len()
                        ]
                    })
                })
                .collect::<Vec<_>>();

            Ok(json!({ "rows": rows, "status": "OK" }))
        }
    }

    fn registry() -> OfficeRegistry {
        OfficeRegistry::new(vec![
            Office::new("A", "A St"),
            Office::new("B", "B Ave"),
            Office::new("C", "Unknown Rd"),
        ])
    }

    fn area() -> MultiPolygon {
        MultiPolygon::new(vec![polygon![
            (x: -74.02, y: 40.70),
            (x: -73.93, y: 40.70),
            (x: -73.93, y: 40.88),
            (x: -74.02, y: 40.88)
        ]])
    }

    fn params(roommates: &[&str]) -> AnalysisParams {
        AnalysisParams {
            roommates: roommates.iter().map(|name| name.to_string()).collect(),
            total: 4,
            batch_size: 2,
            batch: BatchParams::default(),
            sampler: SamplerParams::default(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let maps = FakeMaps::default();
        let area = area();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut batches = Vec::new();

        let analysis = run_analysis(
            &maps,
            &registry(),
            &area,
            &params(&["A", "B"]),
            &mut rng,
            |index, accumulator| batches.push((index, accumulator.len())),
        )
        .await
        .unwrap();

        assert_eq!(batches, vec![(0, 2), (1, 4)]);
        assert_eq!(maps.matrix_requests.get(), 2);
        assert_eq!(maps.geocode_requests.get(), 2);

        let accumulator = &analysis.accumulator;
        assert_eq!(accumulator.len(), 4);
        assert_eq!(accumulator.xs().len(), 4);
        assert_eq!(accumulator.ys().len(), 4);
        assert_eq!(accumulator.means(), &[900.0; 4]);
        assert_eq!(accumulator.variances(), &[90_000.0; 4]);

        assert_eq!(analysis.offices[1].name, "B");
        assert_eq!(
            analysis.office_locations,
            vec![Point::new(-74.0, 40.71), Point::new(-73.95, 40.8)]
        );

        let svg = render_svg_string(
            DEFAULT_SIZE,
            &HeatmapScene {
                area: &area,
                accumulator,
                offices: &analysis.office_locations,
            },
        )
        .unwrap();
        assert!(svg.contains("<circle"));
    }

    #[tokio::test]
    async fn test_malformed_response_aborts() {
        let maps = FakeMaps {
            malformed: true,
            ..FakeMaps::default()
        };
        let area = area();
        let mut rng = SmallRng::seed_from_u64(42);

        let error = run_analysis(
            &maps,
            &registry(),
            &area,
            &params(&["A", "B"]),
            &mut rng,
            |_, _| {},
        )
        .await
        .err()
        .unwrap();

        match error {
            AnalysisError::Batch(BatchError::MalformedResponse { response, .. }) => {
                assert_eq!(response, json!({ "status": "OVER_QUERY_LIMIT" }));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(maps.matrix_requests.get(), 1);
        assert_eq!(maps.geocode_requests.get(), 0);
    }

    #[tokio::test]
    async fn test_unknown_roommate_makes_no_request() {
        let maps = FakeMaps::default();
        let area = area();
        let mut rng = SmallRng::seed_from_u64(42);

        let error = run_analysis(
            &maps,
            &registry(),
            &area,
            &params(&["A", "Zoe"]),
            &mut rng,
            |_, _| {},
        )
        .await
        .err()
        .unwrap();

        assert!(matches!(error, AnalysisError::UnknownOffice(_)));
        assert_eq!(maps.matrix_requests.get(), 0);
    }

    #[tokio::test]
    async fn test_geocoding_failure_names_the_office() {
        let maps = FakeMaps::default();
        let area = area();
        let mut rng = SmallRng::seed_from_u64(42);

        let error = run_analysis(
            &maps,
            &registry(),
            &area,
            &params(&["A", "C"]),
            &mut rng,
            |_, _| {},
        )
        .await
        .err()
        .unwrap();

        match error {
            AnalysisError::Geocode { name, source } => {
                assert_eq!(name, "C");
                assert!(matches!(source, MapsError::NoResults { .. }));
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
