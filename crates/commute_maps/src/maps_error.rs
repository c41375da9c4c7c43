use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("No geocoding result for {address:?} (status {status}{})", format_message(.message))]
    NoResults {
        address: String,
        status: String,
        message: Option<String>,
    },

    #[error("Environment variable {0} is not set")]
    MissingApiKey(&'static str),
}

pub(crate) fn format_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}
