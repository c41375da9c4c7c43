use serde::Deserialize;
use thiserror::Error;

use crate::maps_error::format_message;

/// Travel times in seconds between origins and destinations.
/// Stored as a flat row-major vector, one row per origin:
/// `index = origin * num_destinations + destination`
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeMatrix {
    times: Vec<f64>,
    num_origins: usize,
    num_destinations: usize,
}

impl TravelTimeMatrix {
    pub fn num_origins(&self) -> usize {
        self.num_origins
    }

    pub fn num_destinations(&self) -> usize {
        self.num_destinations
    }

    #[inline(always)]
    pub fn time(&self, origin: usize, destination: usize) -> f64 {
        self.times[origin * self.num_destinations + destination]
    }

    pub fn column(&self, destination: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.num_origins).map(move |origin| self.time(origin, destination))
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("Response status {status}{}", format_message(.message))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("Missing row for origin {origin}")]
    MissingRow { origin: usize },

    #[error("Missing element for origin {origin}, destination {destination}")]
    MissingElement { origin: usize, destination: usize },

    #[error("No duration for origin {origin}, destination {destination} (status {status})")]
    MissingDuration {
        origin: usize,
        destination: usize,
        status: String,
    },
}

#[derive(Deserialize)]
struct TextValue {
    value: f64,
}

#[derive(Deserialize)]
struct Element {
    #[serde(default)]
    status: String,
    duration: Option<TextValue>,
}

#[derive(Deserialize)]
struct Row {
    elements: Vec<Element>,
}

#[derive(Deserialize)]
struct DistanceMatrixResponse {
    status: Option<String>,
    error_message: Option<String>,
    rows: Vec<Row>,
}

/// Reads `rows[i].elements[j].duration.value` for every origin `i` and
/// destination `j` of a distance matrix response.
pub fn extract_travel_times(
    response: &serde_json::Value,
    num_origins: usize,
    num_destinations: usize,
) -> Result<TravelTimeMatrix, ExtractionError> {
    let response = DistanceMatrixResponse::deserialize(response)?;

    match response.status {
        Some(status) if status != "OK" => {
            return Err(ExtractionError::Status {
                status,
                message: response.error_message,
            });
        }
        _ => {}
    }

    let mut times = Vec::with_capacity(num_origins * num_destinations);

    for origin in 0..num_origins {
        let row = response
            .rows
            .get(origin)
            .ok_or(ExtractionError::MissingRow { origin })?;

        for destination in 0..num_destinations {
            let element = row
                .elements
                .get(destination)
                .ok_or(ExtractionError::MissingElement {
                    origin,
                    destination,
                })?;

            let duration =
                element
                    .duration
                    .as_ref()
                    .ok_or_else(|| ExtractionError::MissingDuration {
                        origin,
                        destination,
                        status: element.status.clone(),
                    })?;

            times.push(duration.value.trunc());
        }
    }

    Ok(TravelTimeMatrix {
        times,
        num_origins,
        num_destinations,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn element(seconds: f64) -> serde_json::Value {
        json!({
            "distance": { "text": "1 mi", "value": 1609 },
            "duration": { "text": format!("{} mins", seconds / 60.0), "value": seconds },
            "status": "OK"
        })
    }

    #[test]
    fn test_extract_travel_times() {
        let response = json!({
            "destination_addresses": ["x", "y", "z"],
            "origin_addresses": ["a", "b"],
            "rows": [
                { "elements": [element(600.0), element(1500.0), element(60.0)] },
                { "elements": [element(1200.0), element(900.0), element(120.0)] }
            ],
            "status": "OK"
        });

        let matrix = extract_travel_times(&response, 2, 3).unwrap();

        assert_eq!(
            matrix,
            TravelTimeMatrix {
                times: vec![600.0, 1500.0, 60.0, 1200.0, 900.0, 120.0],
                num_origins: 2,
                num_destinations: 3,
            }
        );
        assert_eq!(matrix.num_origins(), 2);
        assert_eq!(matrix.num_destinations(), 3);
        assert_eq!(matrix.time(1, 0), 1200.0);
        assert_eq!(matrix.time(0, 1), 1500.0);
        assert_eq!(matrix.column(2).collect::<Vec<_>>(), vec![60.0, 120.0]);
    }

    #[test]
    fn test_extract_ignores_extra_elements() {
        let response = json!({
            "rows": [{ "elements": [element(30.0), element(40.0)] }]
        });

        let matrix = extract_travel_times(&response, 1, 1).unwrap();
        assert_eq!(matrix.num_destinations(), 1);
        assert_eq!(matrix.time(0, 0), 30.0);
    }

    #[test]
    fn test_extract_missing_rows() {
        let response = json!({ "status": "INVALID_REQUEST" });

        let error = extract_travel_times(&response, 1, 1).unwrap_err();
        assert!(matches!(error, ExtractionError::Shape(_)));
    }

    #[test]
    fn test_extract_error_status() {
        let response = json!({
            "rows": [],
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        });

        let error = extract_travel_times(&response, 1, 1).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Response status REQUEST_DENIED: The provided API key is invalid."
        );
    }

    #[test]
    fn test_extract_short_response() {
        let response = json!({
            "rows": [{ "elements": [element(30.0)] }],
            "status": "OK"
        });

        assert!(matches!(
            extract_travel_times(&response, 2, 1).unwrap_err(),
            ExtractionError::MissingRow { origin: 1 }
        ));
        assert!(matches!(
            extract_travel_times(&response, 1, 2).unwrap_err(),
            ExtractionError::MissingElement {
                origin: 0,
                destination: 1
            }
        ));
    }

    #[test]
    fn test_extract_unreachable_destination() {
        let response = json!({
            "rows": [{ "elements": [element(30.0), { "status": "ZERO_RESULTS" }] }],
            "status": "OK"
        });

        let error = extract_travel_times(&response, 1, 2).unwrap_err();
        match error {
            ExtractionError::MissingDuration {
                origin,
                destination,
                status,
            } => {
                assert_eq!((origin, destination), (0, 1));
                assert_eq!(status, "ZERO_RESULTS");
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
