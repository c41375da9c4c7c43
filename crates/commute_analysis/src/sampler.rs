use geo::{BoundingRect, Contains, MultiPolygon, Point};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    #[error("Sampling area has no positive-size bounding rectangle")]
    DegenerateArea,

    #[error("Sampled only {accepted}/{requested} points after {attempts} attempts")]
    AttemptsExhausted {
        requested: usize,
        accepted: usize,
        attempts: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct SamplerParams {
    /// Attempt budget is `max_attempts_per_point * count`
    pub max_attempts_per_point: usize,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            max_attempts_per_point: 10_000,
        }
    }
}

/// Uniform sampling inside an area by rejection: points are drawn in the
/// bounding rectangle and kept when the area contains them. Points on the
/// boundary are rejected.
pub struct RejectionSampler {
    params: SamplerParams,
}

impl RejectionSampler {
    pub fn new(params: SamplerParams) -> Self {
        Self { params }
    }

    pub fn sample<R>(
        &self,
        area: &MultiPolygon,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Point>, SamplingError>
    where
        R: Rng,
    {
        if count == 0 {
            return Ok(Vec::new());
        }

        let bounds = area.bounding_rect().ok_or(SamplingError::DegenerateArea)?;
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(SamplingError::DegenerateArea);
        }

        let (min, max) = (bounds.min(), bounds.max());
        let max_attempts = self.params.max_attempts_per_point.saturating_mul(count);

        let mut points = Vec::with_capacity(count);
        let mut attempts = 0;

        while points.len() < count {
            if attempts >= max_attempts {
                return Err(SamplingError::AttemptsExhausted {
                    requested: count,
                    accepted: points.len(),
                    attempts,
                });
            }
            attempts += 1;

            let point = Point::new(
                rng.random_range(min.x..max.x),
                rng.random_range(min.y..max.y),
            );

            if area.contains(&point) {
                points.push(point);
            }
        }

        debug!("Sampled {} points in {} attempts", count, attempts);

        Ok(points)
    }
}

impl Default for RejectionSampler {
    fn default() -> Self {
        Self::new(SamplerParams::default())
    }
}
