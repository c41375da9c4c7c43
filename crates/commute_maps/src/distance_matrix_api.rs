use std::future::Future;

use tracing::debug;

use crate::{
    maps_client::{GOOGLE_DISTANCE_MATRIX_API_URL, GoogleMapsClient, UNITS},
    maps_error::MapsError,
    travel_mode::{TransitMode, TravelMode},
};

/// Limits of a single Distance Matrix request.
/// https://developers.google.com/maps/documentation/distance-matrix/usage-and-billing#other-usage-limits
pub const MAX_ORIGINS_PER_REQUEST: usize = 25;
pub const MAX_DESTINATIONS_PER_REQUEST: usize = 25;
pub const MAX_ELEMENTS_PER_REQUEST: usize = 100;

#[derive(Debug, Clone)]
pub struct DistanceMatrixRequest {
    /// Postal addresses
    pub origins: Vec<String>,

    /// x is the longitude, y the latitude
    pub destinations: Vec<geo_types::Point>,

    pub mode: TravelMode,
    pub transit_mode: TransitMode,
}

impl DistanceMatrixRequest {
    pub fn num_elements(&self) -> usize {
        self.origins.len() * self.destinations.len()
    }
}

/// Source of raw distance matrix responses. The body is returned as parsed
/// JSON without any validation of its shape, see
/// [`crate::travel_time_matrix::extract_travel_times`].
pub trait DistanceMatrixSource {
    fn fetch_distance_matrix(
        &self,
        request: &DistanceMatrixRequest,
    ) -> impl Future<Output = Result<serde_json::Value, MapsError>>;
}

pub fn format_origins<S: AsRef<str>>(origins: &[S]) -> String {
    origins
        .iter()
        .map(|origin| origin.as_ref())
        .collect::<Vec<_>>()
        .join("|")
}

/// Destinations are sent as `lat,lng` pairs.
pub fn format_destinations(destinations: &[geo_types::Point]) -> String {
    destinations
        .iter()
        .map(|point| format!("{},{}", point.y(), point.x()))
        .collect::<Vec<_>>()
        .join("|")
}

impl GoogleMapsClient {
    pub(crate) fn distance_matrix_request(
        &self,
        request: &DistanceMatrixRequest,
    ) -> Result<reqwest::Request, MapsError> {
        let mut query = vec![
            ("origins", format_origins(&request.origins)),
            ("destinations", format_destinations(&request.destinations)),
            ("mode", request.mode.to_string()),
        ];

        if request.mode == TravelMode::Transit {
            query.push(("transit_mode", request.transit_mode.to_string()));
        }

        query.push(("units", UNITS.to_string()));
        query.push(("key", self.api_key().to_string()));

        let request = self
            .client
            .get(GOOGLE_DISTANCE_MATRIX_API_URL)
            .query(&query)
            .build()?;

        Ok(request)
    }
}

impl DistanceMatrixSource for GoogleMapsClient {
    async fn fetch_distance_matrix(
        &self,
        request: &DistanceMatrixRequest,
    ) -> Result<serde_json::Value, MapsError> {
        debug!(
            "GoogleMaps: requesting distance matrix {}x{} ({} elements, {})",
            request.origins.len(),
            request.destinations.len(),
            request.num_elements(),
            request.mode
        );

        let http_request = self.distance_matrix_request(request)?;
        let body = self.execute(http_request).await?;

        Ok(serde_json::from_str(&body)?)
    }
}
