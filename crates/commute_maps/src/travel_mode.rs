use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// https://developers.google.com/maps/documentation/distance-matrix/distance-matrix#mode
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    #[default]
    Transit,
}

/// Only sent along with [`TravelMode::Transit`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TransitMode {
    Bus,
    #[default]
    Subway,
    Train,
    Tram,
    Rail,
}

#[derive(Debug, Error)]
#[error("Unknown {kind} {value:?}, expected one of: {expected}")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Driving => "driving",
                TravelMode::Walking => "walking",
                TravelMode::Bicycling => "bicycling",
                TravelMode::Transit => "transit",
            }
        )
    }
}

impl FromStr for TravelMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "bicycling" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(ParseModeError {
                kind: "travel mode",
                value: s.to_string(),
                expected: "driving, walking, bicycling, transit",
            }),
        }
    }
}

impl Display for TransitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransitMode::Bus => "bus",
                TransitMode::Subway => "subway",
                TransitMode::Train => "train",
                TransitMode::Tram => "tram",
                TransitMode::Rail => "rail",
            }
        )
    }
}

impl FromStr for TransitMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bus" => Ok(TransitMode::Bus),
            "subway" => Ok(TransitMode::Subway),
            "train" => Ok(TransitMode::Train),
            "tram" => Ok(TransitMode::Tram),
            "rail" => Ok(TransitMode::Rail),
            _ => Err(ParseModeError {
                kind: "transit mode",
                value: s.to_string(),
                expected: "bus, subway, train, tram, rail",
            }),
        }
    }
}
