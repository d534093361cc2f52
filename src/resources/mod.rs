//! The six dashboard resources
//!
//! Each resource says how its parameters become a [`QueryKey`] and a
//! [`ResourceRequest`], when it fires, how long its answers stay fresh, and
//! what the card says when the request fails. The binder does the rest.

pub mod books;
pub mod cep;
pub mod countries;
pub mod news;
pub mod weather;
pub mod worldbank;

use std::fmt::Debug;
use std::time::Duration;

use crate::envelope::Payload;
use crate::query::{QueryKey, ResourceRequest};

pub use books::{Books, BooksQuery};
pub use cep::{format_cep, Cep, CepInput};
pub use countries::{format_population, Countries, REGIONS};
pub use news::{relative_age, News, NewsCategory, NEWS_DISPLAY_LIMIT};
pub use weather::{Weather, WeatherQuery};
pub use worldbank::{WorldBank, WorldBankQuery, WORLDBANK_INITIAL_DISPLAY};

/// Reference data changes slowly
pub const REFERENCE_FRESHNESS: Duration = Duration::from_secs(60 * 60);

/// When a card issues its first request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// As soon as the card mounts, with [`Resource::initial_params`]
    OnMount,
    /// Only once the user supplies a non-empty input
    OnInput,
}

pub trait Resource: Send + Sync + 'static {
    type Params: Clone + Debug + Send + Sync + 'static;
    type Payload: Payload + Debug;

    const NAME: &'static str;
    const TRIGGER: TriggerMode;
    /// `None` means answers are never reused
    const DEFAULT_FRESHNESS: Option<Duration>;
    /// Shown in place of the card when a request fails
    const FAILURE_MESSAGE: &'static str;

    /// `None` when the parameters are empty and no request should fire
    fn key(params: &Self::Params) -> Option<QueryKey>;

    fn request(params: &Self::Params) -> ResourceRequest;

    /// Parameters used on mount by [`TriggerMode::OnMount`] resources
    fn initial_params() -> Option<Self::Params> {
        None
    }
}
