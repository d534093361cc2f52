//! World Bank economic indicators card

use dashboard_types::{WorldBankCountries, WorldBankCountry};

use super::{Resource, TriggerMode, REFERENCE_FRESHNESS};
use crate::envelope::Payload;
use crate::filter::{FacetKind, Filterable};
use crate::query::{QueryKey, ResourceRequest};

/// Rows shown before "show more"
pub const WORLDBANK_INITIAL_DISPLAY: usize = 6;
pub const DEFAULT_PER_PAGE: u32 = 100;

pub struct WorldBank;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldBankQuery {
    pub per_page: u32,
}

impl Default for WorldBankQuery {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Resource for WorldBank {
    type Params = WorldBankQuery;
    type Payload = WorldBankCountries;

    const NAME: &'static str = "worldbank";
    const TRIGGER: TriggerMode = TriggerMode::OnMount;
    const DEFAULT_FRESHNESS: Option<std::time::Duration> = Some(REFERENCE_FRESHNESS);
    const FAILURE_MESSAGE: &'static str = "Could not load World Bank data.";

    fn key(params: &WorldBankQuery) -> Option<QueryKey> {
        Some(QueryKey::new(
            Self::NAME,
            ["countries".to_string(), params.per_page.to_string()],
        ))
    }

    fn request(params: &WorldBankQuery) -> ResourceRequest {
        ResourceRequest::get("/worldbank/countries").param("per_page", params.per_page)
    }

    fn initial_params() -> Option<WorldBankQuery> {
        Some(WorldBankQuery::default())
    }
}

impl Payload for WorldBankCountries {
    fn empty() -> Self {
        WorldBankCountries::default()
    }

    fn item_count(&self) -> usize {
        self.countries.len()
    }
}

impl Filterable for WorldBankCountry {
    // The free-text box matches region and income level as well as the name
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.region.as_deref());
        fields.extend(self.income_level.as_deref());
        fields
    }

    fn facet_values(&self, kind: FacetKind) -> Vec<&str> {
        match kind {
            FacetKind::Region => self.region.as_deref().into_iter().collect(),
            FacetKind::IncomeLevel => self.income_level.as_deref().into_iter().collect(),
            FacetKind::Subject | FacetKind::Source => Vec::new(),
        }
    }
}
