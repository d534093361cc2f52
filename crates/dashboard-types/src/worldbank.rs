//! World Bank country list

use serde::{Deserialize, Serialize};

/// Result of `GET /worldbank/countries`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldBankCountries {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub countries: Vec<WorldBankCountry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldBankCountry {
    /// ISO 3166-1 alpha-3 code used by the World Bank
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub name: String,
    #[serde(default)]
    pub capital_city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub income_level: Option<String>,
    #[serde(default)]
    pub lending_type: Option<String>,
    // The World Bank API sends coordinates as strings
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
}
