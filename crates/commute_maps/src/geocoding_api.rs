use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use crate::{
    maps_client::{GOOGLE_GEOCODE_API_URL, GoogleMapsClient, UNITS},
    maps_error::MapsError,
};

/// Resolves a postal address to a point, x is the longitude and y the latitude.
pub trait Geocoder {
    fn geocode(&self, address: &str)
    -> impl Future<Output = Result<geo_types::Point, MapsError>>;
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for geo_types::Point {
    fn from(value: LatLng) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

#[derive(Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: String,

    #[serde(default)]
    results: Vec<GeocodeResult>,

    error_message: Option<String>,
}

/// Reads `results[0].geometry.location` out of a geocoding response body.
pub fn parse_geocode_response(address: &str, body: &str) -> Result<geo_types::Point, MapsError> {
    let response: GeocodeResponse = serde_json::from_str(body)?;

    match response.results.into_iter().next() {
        Some(result) => Ok(result.geometry.location.into()),
        None => Err(MapsError::NoResults {
            address: address.to_string(),
            status: response.status,
            message: response.error_message,
        }),
    }
}

impl GoogleMapsClient {
    pub(crate) fn geocode_request(&self, address: &str) -> Result<reqwest::Request, MapsError> {
        let request = self
            .client
            .get(GOOGLE_GEOCODE_API_URL)
            .query(&[
                ("address", address),
                ("units", UNITS),
                ("key", self.api_key()),
            ])
            .build()?;

        Ok(request)
    }
}

impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<geo_types::Point, MapsError> {
        debug!("GoogleMaps: geocoding {:?}", address);

        let request = self.geocode_request(address)?;
        let body = self.execute(request).await?;

        parse_geocode_response(address, &body)
    }
}

#[cfg(test)]
mod tests {
    use crate::maps_client::MapsClientParams;

    use super::*;

    const SAMPLE: &str = r#"{
        "results": [
            {
                "formatted_address": "85 Broad St, New York, NY 10004, USA",
                "geometry": {
                    "location": { "lat": 40.7043, "lng": -74.0107 },
                    "location_type": "ROOFTOP"
                }
            },
            {
                "geometry": { "location": { "lat": 0.0, "lng": 0.0 } }
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn test_parse_first_result() {
        let point = parse_geocode_response("85 Broad St", SAMPLE).unwrap();

        assert_eq!(point.x(), -74.0107);
        assert_eq!(point.y(), 40.7043);
    }

    #[test]
    fn test_parse_no_results() {
        let body = r#"{
            "results": [],
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;

        let error = parse_geocode_response("nowhere", body).unwrap_err();
        match error {
            MapsError::NoResults {
                address,
                status,
                message,
            } => {
                assert_eq!(address, "nowhere");
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_parse_invalid_body() {
        let error = parse_geocode_response("85 Broad St", "<html>").unwrap_err();
        assert!(matches!(error, MapsError::Deserialize(_)));
    }

    #[test]
    fn test_geocode_request_query() {
        let client = GoogleMapsClient::new(MapsClientParams {
            api_key: String::from("secret"),
            timeout: None,
        })
        .unwrap();

        let request = client
            .geocode_request("350 5th Ave #5100, New York, NY 10118")
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str().split('?').next(),
            Some(GOOGLE_GEOCODE_API_URL)
        );

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                (
                    String::from("address"),
                    String::from("350 5th Ave #5100, New York, NY 10118")
                ),
                (String::from("units"), String::from("imperial")),
                (String::from("key"), String::from("secret")),
            ]
        );

        // '#' must not end up as a fragment
        assert!(request.url().fragment().is_none());
    }
}
