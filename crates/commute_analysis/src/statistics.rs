use commute_maps::travel_time_matrix::TravelTimeMatrix;

pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Per destination mean and variance of the travel time across origins, in
/// seconds and seconds².
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommuteStatistics {
    pub means: Vec<f64>,
    pub variances: Vec<f64>,
}

impl CommuteStatistics {
    /// Column-wise reduction of the matrix. The variance is the population
    /// variance, divided by the number of origins.
    pub fn from_matrix(matrix: &TravelTimeMatrix) -> Self {
        let num_destinations = matrix.num_destinations();
        let num_origins = matrix.num_origins() as f64;

        let mut means = Vec::with_capacity(num_destinations);
        let mut variances = Vec::with_capacity(num_destinations);

        for destination in 0..num_destinations {
            let mean = matrix.column(destination).sum::<f64>() / num_origins;
            let variance = matrix
                .column(destination)
                .map(|time| (time - mean).powi(2))
                .sum::<f64>()
                / num_origins;

            means.push(mean);
            variances.push(variance);
        }

        Self { means, variances }
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / SECONDS_PER_MINUTE
}
