//! API Dashboard - remote resource view binders
//!
//! Six independent cards (books, CEP lookup, countries, World Bank, weather,
//! news) each bind a parameter set to a request against the backend proxy and
//! expose the outcome as a [`ViewState`]:
//!
//! ```text
//! params -> Resource::key -> cache? -> Fetcher -> Envelope -> Payload -> ViewState
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use api_dashboard::{DashboardConfig, Dashboard};
//! use api_dashboard::resources::BooksQuery;
//!
//! # async fn run() -> api_dashboard::error::Result<()> {
//! let config = DashboardConfig::default();
//! let mut dashboard = Dashboard::from_config(&config)?;
//! dashboard.mount();
//! dashboard.books.set_params(BooksQuery::new("dune"));
//! dashboard.settle_all().await;
//! println!("{:?}", dashboard.books.status());
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Keys, envelopes and view states
pub mod envelope;
pub mod query;
pub mod view_state;

// Fetch lifecycle
pub mod binder;
pub mod cache;
pub mod client;

// Configuration
pub mod config;

// Client-side search, facets and "show more"
pub mod filter;

// The six cards and the page that holds them
pub mod dashboard;
pub mod resources;

pub use binder::{ResourceBinder, Trigger};
pub use cache::QueryCache;
pub use client::{Fetcher, HttpFetcher, RetryPolicy};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use envelope::{Envelope, Payload};
pub use error::{ConfigError, ErrorClass, FetchError};
pub use filter::{apply, FacetKind, FilterCriteria, Filterable, FilteredView, Window};
pub use query::{QueryKey, ResourceRequest};
pub use resources::{Resource, TriggerMode};
pub use view_state::{ViewEvent, ViewState, ViewStatus};

// Shared payload types
pub use dashboard_types;
