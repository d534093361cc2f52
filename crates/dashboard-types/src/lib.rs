//! Payload types for the dashboard backend proxy
//!
//! One module per card. These are the canonical payloads that remain after
//! the response envelope has been stripped, so none of them carry the
//! `success`/`message` wrapper fields.
//!
//! ## Rules
//!
//! 1. Every field the proxy may omit is `#[serde(default)]` - a partial record
//!    still decodes; non-optional fields also accept `null`
//! 2. List payloads implement `Default` as the empty result
//! 3. Field names follow the proxy's snake_case JSON

mod de;

pub mod books;
pub mod cep;
pub mod countries;
pub mod news;
pub mod weather;
pub mod worldbank;

pub use books::{Book, BookSearch};
pub use cep::Address;
pub use countries::{Country, CountryList};
pub use news::{Article, ArticleSource, NewsFeed};
pub use weather::{Clouds, Coordinates, CurrentConditions, Location, WeatherReport, Wind};
pub use worldbank::{WorldBankCountries, WorldBankCountry};
