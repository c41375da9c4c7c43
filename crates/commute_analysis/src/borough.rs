use std::{convert::Infallible, path::PathBuf, str::FromStr, time::Duration};

use geo::MultiPolygon;
use geojson::GeoJson;
use thiserror::Error;
use tracing::{debug, info};

/// The `nyc_boroughs` dataset, one feature per borough.
pub const NYC_BOROUGHS_URL: &str =
    "https://raw.githubusercontent.com/ResidentMario/geoplot-data/master/nyc-boroughs.geojson";

pub const BOROUGH_NAME_PROPERTY: &str = "BoroName";

pub const DEFAULT_BOROUGH: &str = "Manhattan";

#[derive(Debug, Error)]
pub enum BoroughError {
    #[error("Failed to read borough dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to download borough dataset: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Borough dataset is not a feature collection")]
    NotAFeatureCollection,

    #[error("No borough named {0:?} in dataset")]
    NotFound(String),

    #[error("Borough {0:?} has no polygon geometry")]
    UnsupportedGeometry(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoroughSource {
    Path(PathBuf),
    Url(String),
}

impl Default for BoroughSource {
    fn default() -> Self {
        BoroughSource::Url(NYC_BOROUGHS_URL.to_string())
    }
}

impl FromStr for BoroughSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(BoroughSource::Url(s.to_string()))
        } else {
            Ok(BoroughSource::Path(PathBuf::from(s)))
        }
    }
}

fn download_request(
    client: &reqwest::Client,
    url: &str,
    timeout: Option<Duration>,
) -> Result<reqwest::Request, BoroughError> {
    let mut builder = client.get(url);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

impl BoroughSource {
    async fn read(&self, timeout: Option<Duration>) -> Result<String, BoroughError> {
        match self {
            BoroughSource::Path(path) => {
                debug!("Reading borough dataset from {}", path.display());
                Ok(std::fs::read_to_string(path)?)
            }
            BoroughSource::Url(url) => {
                debug!("Downloading borough dataset from {}", url);
                let client = reqwest::Client::new();
                let request = download_request(&client, url, timeout)?;
                let response = client.execute(request).await?.error_for_status()?;
                Ok(response.text().await?)
            }
        }
    }
}

/// `timeout` bounds the download when the source is a URL.
pub async fn load_borough(
    source: &BoroughSource,
    name: &str,
    timeout: Option<Duration>,
) -> Result<MultiPolygon, BoroughError> {
    let content = source.read(timeout).await?;
    let borough = parse_borough(&content, name)?;

    info!(
        "Loaded borough {} ({} polygons)",
        name,
        borough.0.len()
    );

    Ok(borough)
}

/// Finds the feature whose `BoroName` property equals `name`.
pub fn parse_borough(content: &str, name: &str) -> Result<MultiPolygon, BoroughError> {
    let collection = match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(BoroughError::NotAFeatureCollection),
    };

    let feature = collection
        .features
        .into_iter()
        .find(|feature| {
            feature
                .property(BOROUGH_NAME_PROPERTY)
                .and_then(|value| value.as_str())
                == Some(name)
        })
        .ok_or_else(|| BoroughError::NotFound(name.to_string()))?;

    let geometry = feature
        .geometry
        .ok_or_else(|| BoroughError::UnsupportedGeometry(name.to_string()))?;

    match geo::Geometry::<f64>::try_from(geometry)? {
        geo::Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        geo::Geometry::MultiPolygon(multi_polygon) => Ok(multi_polygon),
        _ => Err(BoroughError::UnsupportedGeometry(name.to_string())),
    }
}
