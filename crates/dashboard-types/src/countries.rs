//! REST Countries metadata

use serde::{Deserialize, Serialize};

/// Result of `GET /countries/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryList {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub name: String,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub population: u64,
    #[serde(default)]
    pub area: Option<f64>,
    /// Flag image URL
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub currencies: Vec<String>,
    /// ISO 3166-1 alpha-2
    #[serde(default)]
    pub code: Option<String>,
    /// ISO 3166-1 alpha-3
    #[serde(default)]
    pub code3: Option<String>,
}
