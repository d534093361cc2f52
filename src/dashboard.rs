//! The dashboard page: six independent cards over one proxy connection

use std::sync::Arc;

use tracing::info;

use crate::binder::ResourceBinder;
use crate::client::{Fetcher, HttpFetcher};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::resources::{Books, Cep, Countries, News, Resource, Weather, WorldBank};
use crate::view_state::ViewStatus;

/// Cards never share state; only the fetcher is common
pub struct Dashboard {
    pub books: ResourceBinder<Books>,
    pub cep: ResourceBinder<Cep>,
    pub countries: ResourceBinder<Countries>,
    pub worldbank: ResourceBinder<WorldBank>,
    pub weather: ResourceBinder<Weather>,
    pub news: ResourceBinder<News>,
}

impl Dashboard {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &DashboardConfig) -> Self {
        Self {
            books: ResourceBinder::new(Arc::clone(&fetcher), config),
            cep: ResourceBinder::new(Arc::clone(&fetcher), config),
            countries: ResourceBinder::new(Arc::clone(&fetcher), config),
            worldbank: ResourceBinder::new(Arc::clone(&fetcher), config),
            weather: ResourceBinder::new(Arc::clone(&fetcher), config),
            news: ResourceBinder::new(fetcher, config),
        }
    }

    /// Dashboard talking to the proxy at `config.base_url`
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// Fire every on-mount card. Input-gated cards stay idle.
    pub fn mount(&mut self) {
        info!("mounting dashboard cards");
        self.books.mount();
        self.cep.mount();
        self.countries.mount();
        self.worldbank.mount();
        self.weather.mount();
        self.news.mount();
    }

    pub fn process_pending(&mut self) -> usize {
        self.books.process_pending()
            + self.cep.process_pending()
            + self.countries.process_pending()
            + self.worldbank.process_pending()
            + self.weather.process_pending()
            + self.news.process_pending()
    }

    /// Wait for every card's current request
    pub async fn settle_all(&mut self) {
        futures::join!(
            self.books.settle(),
            self.cep.settle(),
            self.countries.settle(),
            self.worldbank.settle(),
            self.weather.settle(),
            self.news.settle(),
        );
    }

    pub fn statuses(&self) -> [(&'static str, ViewStatus); 6] {
        [
            (Books::NAME, self.books.status()),
            (Cep::NAME, self.cep.status()),
            (Countries::NAME, self.countries.status()),
            (WorldBank::NAME, self.worldbank.status()),
            (Weather::NAME, self.weather.status()),
            (News::NAME, self.news.status()),
        ]
    }
}
