//! Weather card

use dashboard_types::WeatherReport;

use super::{Resource, TriggerMode};
use crate::envelope::Payload;
use crate::query::{QueryKey, ResourceRequest};

pub struct Weather;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into() }
    }
}

impl Resource for Weather {
    type Params = WeatherQuery;
    type Payload = Option<WeatherReport>;

    const NAME: &'static str = "weather";
    const TRIGGER: TriggerMode = TriggerMode::OnInput;
    // Conditions change; always ask again
    const DEFAULT_FRESHNESS: Option<std::time::Duration> = None;
    const FAILURE_MESSAGE: &'static str =
        "Could not load the weather. Check that the weather API key is configured.";

    fn key(params: &WeatherQuery) -> Option<QueryKey> {
        let city = params.city.trim();
        if city.is_empty() {
            return None;
        }
        Some(QueryKey::new(Self::NAME, [city]))
    }

    fn request(params: &WeatherQuery) -> ResourceRequest {
        ResourceRequest::get("/weather").param("city", params.city.trim())
    }
}

impl Payload for Option<WeatherReport> {
    fn empty() -> Self {
        None
    }

    fn item_count(&self) -> usize {
        usize::from(self.is_some())
    }
}
