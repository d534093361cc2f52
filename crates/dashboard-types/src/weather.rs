//! Current weather conditions

use serde::{Deserialize, Serialize};

/// Result of `GET /weather?city=`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentConditions,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub wind: Wind,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub clouds: Clouds,
    /// Metres
    #[serde(default)]
    pub visibility: Option<f64>,
    /// Unix seconds of the observation
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Celsius
    pub temperature: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    /// Percent
    #[serde(default)]
    pub humidity: Option<f64>,
    /// hPa
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// m/s
    #[serde(default)]
    pub speed: Option<f64>,
    /// Degrees
    #[serde(default)]
    pub direction: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    /// Percent
    #[serde(default)]
    pub coverage: Option<f64>,
}
