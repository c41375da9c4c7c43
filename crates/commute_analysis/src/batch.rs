use commute_maps::{
    distance_matrix_api::{
        DistanceMatrixRequest, DistanceMatrixSource, MAX_DESTINATIONS_PER_REQUEST,
        MAX_ELEMENTS_PER_REQUEST, MAX_ORIGINS_PER_REQUEST,
    },
    maps_error::MapsError,
    travel_mode::{TransitMode, TravelMode},
    travel_time_matrix::{ExtractionError, extract_travel_times},
};
use geo::{MultiPolygon, Point};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    accumulator::{AccumulatorError, CommuteAccumulator},
    sampler::{RejectionSampler, SamplingError},
    statistics::CommuteStatistics,
};

/// Points preallocated by a run, larger plans grow as batches arrive.
const MAX_PREALLOCATED_POINTS: usize = 64 * MAX_DESTINATIONS_PER_REQUEST;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("At least one origin is required")]
    NoOrigins,

    #[error("Batch size must be at least 1")]
    EmptyBatch,

    #[error("{0} origins exceed the limit of {max} per request", max = MAX_ORIGINS_PER_REQUEST)]
    TooManyOrigins(usize),

    #[error(
        "Batch size {0} exceeds the limit of {max} destinations per request",
        max = MAX_DESTINATIONS_PER_REQUEST
    )]
    TooManyDestinations(usize),

    #[error(
        "{origins} origins x {batch_size} destinations exceed the limit of {max} elements per request",
        max = MAX_ELEMENTS_PER_REQUEST
    )]
    TooManyElements { origins: usize, batch_size: usize },
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error("Distance matrix request failed: {0}")]
    Request(#[from] MapsError),

    #[error("Malformed distance matrix response: {source}")]
    MalformedResponse {
        source: ExtractionError,
        response: serde_json::Value,
    },

    #[error(transparent)]
    Accumulator(#[from] AccumulatorError),
}

/// Splits `total` points into requests of at most `batch_size` destinations.
/// The last batch takes the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    total: usize,
    batch_size: usize,
}

impl BatchPlan {
    pub fn new(total: usize, batch_size: usize, num_origins: usize) -> Result<Self, PlanError> {
        if num_origins == 0 {
            return Err(PlanError::NoOrigins);
        }
        if batch_size == 0 {
            return Err(PlanError::EmptyBatch);
        }
        if num_origins > MAX_ORIGINS_PER_REQUEST {
            return Err(PlanError::TooManyOrigins(num_origins));
        }
        if batch_size > MAX_DESTINATIONS_PER_REQUEST {
            return Err(PlanError::TooManyDestinations(batch_size));
        }
        if num_origins * batch_size > MAX_ELEMENTS_PER_REQUEST {
            return Err(PlanError::TooManyElements {
                origins: num_origins,
                batch_size,
            });
        }

        Ok(Self { total, batch_size })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn num_batches(&self) -> usize {
        self.total.div_ceil(self.batch_size)
    }

    pub fn batch_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_batches()).map(move |batch| {
            let start = batch * self.batch_size;
            self.batch_size.min(self.total - start)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchParams {
    pub mode: TravelMode,
    pub transit_mode: TransitMode,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub points: Vec<Point>,
    pub statistics: CommuteStatistics,
}

/// Samples destinations in the area, asks the distance matrix source for the
/// travel times from every origin, and reduces them per destination.
pub struct BatchAggregator<'a, S> {
    source: &'a S,
    origins: Vec<String>,
    area: &'a MultiPolygon,
    sampler: RejectionSampler,
    params: BatchParams,
}

impl<'a, S> BatchAggregator<'a, S>
where
    S: DistanceMatrixSource,
{
    pub fn new(
        source: &'a S,
        origins: Vec<String>,
        area: &'a MultiPolygon,
        sampler: RejectionSampler,
        params: BatchParams,
    ) -> Self {
        Self {
            source,
            origins,
            area,
            sampler,
            params,
        }
    }

    pub async fn run_batch<R>(&self, size: usize, rng: &mut R) -> Result<BatchResult, BatchError>
    where
        R: Rng,
    {
        let points = self.sampler.sample(self.area, size, rng)?;

        let request = DistanceMatrixRequest {
            origins: self.origins.clone(),
            destinations: points,
            mode: self.params.mode,
            transit_mode: self.params.transit_mode,
        };

        let response = self.source.fetch_distance_matrix(&request).await?;

        let matrix = match extract_travel_times(&response, self.origins.len(), size) {
            Ok(matrix) => matrix,
            Err(source) => return Err(BatchError::MalformedResponse { source, response }),
        };

        debug!(
            "Extracted {}x{} travel times",
            matrix.num_origins(),
            matrix.num_destinations()
        );

        Ok(BatchResult {
            points: request.destinations,
            statistics: CommuteStatistics::from_matrix(&matrix),
        })
    }

    /// Runs every batch of the plan in sequence. Stops at the first failure,
    /// nothing of a failed run is returned.
    pub async fn run_plan<R, F>(
        &self,
        plan: &BatchPlan,
        rng: &mut R,
        mut on_batch: F,
    ) -> Result<CommuteAccumulator, BatchError>
    where
        R: Rng,
        F: FnMut(usize, &CommuteAccumulator),
    {
        let mut accumulator =
            CommuteAccumulator::with_capacity(plan.total().min(MAX_PREALLOCATED_POINTS));

        for (index, size) in plan.batch_sizes().enumerate() {
            let batch = self.run_batch(size, rng).await?;
            accumulator.push_batch(&batch.points, &batch.statistics)?;

            info!(
                "Batch {}/{}: {} points accumulated",
                index + 1,
                plan.num_batches(),
                accumulator.len()
            );

            on_batch(index, &accumulator);
        }

        Ok(accumulator)
    }
}
