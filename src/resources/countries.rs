//! Country metadata card

use dashboard_types::{Country, CountryList};

use super::{Resource, TriggerMode, REFERENCE_FRESHNESS};
use crate::envelope::Payload;
use crate::filter::{FacetKind, Filterable};
use crate::query::{QueryKey, ResourceRequest};

/// Region chips, in display order. "all" is the absence of a facet.
pub const REGIONS: [&str; 5] = ["Africa", "Americas", "Asia", "Europe", "Oceania"];

pub struct Countries;

impl Resource for Countries {
    type Params = ();
    type Payload = CountryList;

    const NAME: &'static str = "countries";
    const TRIGGER: TriggerMode = TriggerMode::OnMount;
    const DEFAULT_FRESHNESS: Option<std::time::Duration> = Some(REFERENCE_FRESHNESS);
    const FAILURE_MESSAGE: &'static str = "Could not load countries.";

    fn key(_params: &()) -> Option<QueryKey> {
        Some(QueryKey::bare(Self::NAME))
    }

    fn request(_params: &()) -> ResourceRequest {
        ResourceRequest::get("/countries/")
    }

    fn initial_params() -> Option<()> {
        Some(())
    }
}

impl Payload for CountryList {
    fn empty() -> Self {
        CountryList::default()
    }

    fn item_count(&self) -> usize {
        self.countries.len()
    }
}

impl Filterable for Country {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.capital.as_deref());
        fields
    }

    fn facet_values(&self, kind: FacetKind) -> Vec<&str> {
        match kind {
            FacetKind::Region => self.region.as_deref().into_iter().collect(),
            FacetKind::IncomeLevel | FacetKind::Subject | FacetKind::Source => Vec::new(),
        }
    }
}

/// Group thousands with `.` the way the card shows populations (`214.326.223`)
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
