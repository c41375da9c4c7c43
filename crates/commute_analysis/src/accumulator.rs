use geo::Point;
use thiserror::Error;

use crate::statistics::CommuteStatistics;

#[derive(Debug, Error, PartialEq)]
#[error("Batch is misaligned: {points} points, {means} means, {variances} variances")]
pub struct AccumulatorError {
    points: usize,
    means: usize,
    variances: usize,
}

/// Index-aligned sequences of sampled points and their travel time
/// statistics, filled batch after batch and never reordered.
#[derive(Debug, Default, Clone)]
pub struct CommuteAccumulator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    means: Vec<f64>,
    variances: Vec<f64>,
}

impl CommuteAccumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
            means: Vec::with_capacity(capacity),
            variances: Vec::with_capacity(capacity),
        }
    }

    /// Appends a batch, or leaves the accumulator untouched when the batch
    /// lengths disagree.
    pub fn push_batch(
        &mut self,
        points: &[Point],
        statistics: &CommuteStatistics,
    ) -> Result<(), AccumulatorError> {
        if points.len() != statistics.means.len() || points.len() != statistics.variances.len() {
            return Err(AccumulatorError {
                points: points.len(),
                means: statistics.means.len(),
                variances: statistics.variances.len(),
            });
        }

        self.xs.extend(points.iter().map(|point| point.x()));
        self.ys.extend(points.iter().map(|point| point.y()));
        self.means.extend_from_slice(&statistics.means);
        self.variances.extend_from_slice(&statistics.variances);

        debug_assert!(self.is_aligned());

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        let len = self.xs.len();
        self.ys.len() == len && self.means.len() == len && self.variances.len() == len
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| Point::new(x, y))
    }
}
