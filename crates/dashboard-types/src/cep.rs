//! ViaCEP address lookup

use serde::{Deserialize, Serialize};

/// Address returned by `GET /cep/{digits}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Formatted CEP as returned upstream (`01001-000`)
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub cep: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Two-letter UF
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub ibge_code: Option<String>,
    #[serde(default)]
    pub gia_code: Option<String>,
    #[serde(default)]
    pub ddd: Option<String>,
    #[serde(default)]
    pub siafi_code: Option<String>,
}

impl Address {
    /// `City - UF` line, omitting whichever half is missing
    pub fn locality(&self) -> Option<String> {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => Some(format!("{} - {}", city, state)),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(state)) => Some(state.to_string()),
            (None, None) => None,
        }
    }
}
