use std::time::Duration;

use crate::maps_error::MapsError;

pub const MAPS_API_KEY_ENV_VAR: &str = "MAPS_API_KEY";

pub const GOOGLE_GEOCODE_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const GOOGLE_DISTANCE_MATRIX_API_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Every request asks for imperial units, durations are seconds either way.
pub(crate) const UNITS: &str = "imperial";

pub struct MapsClientParams {
    pub api_key: String,

    /// No timeout when `None`
    pub timeout: Option<Duration>,
}

impl MapsClientParams {
    pub fn from_env() -> Result<Self, MapsError> {
        let api_key = std::env::var(MAPS_API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(MapsError::MissingApiKey(MAPS_API_KEY_ENV_VAR))?;

        Ok(Self {
            api_key,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the Google Maps web services. Implements
/// [`crate::geocoding_api::Geocoder`] and
/// [`crate::distance_matrix_api::DistanceMatrixSource`].
pub struct GoogleMapsClient {
    pub(crate) params: MapsClientParams,
    pub(crate) client: reqwest::Client,
}

impl GoogleMapsClient {
    pub fn new(params: MapsClientParams) -> Result<Self, MapsError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            params,
        })
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.params.api_key
    }

    /// Sends the request and returns the body, non 2xx statuses are errors.
    pub(crate) async fn execute(&self, request: reqwest::Request) -> Result<String, MapsError> {
        let response = self.client.execute(request).await?;

        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(MapsError::Api { status, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_with_timeout() {
        let params = MapsClientParams {
            api_key: String::from("test-key"),
            timeout: None,
        }
        .with_timeout(Some(Duration::from_secs(5)));

        let client = GoogleMapsClient::new(params).unwrap();
        assert_eq!(client.api_key(), "test-key");
        assert_eq!(client.params.timeout, Some(Duration::from_secs(5)));
    }
}
