//! News headlines card

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use dashboard_types::{Article, NewsFeed};

use super::{Resource, TriggerMode};
use crate::envelope::Payload;
use crate::filter::{FacetKind, Filterable};
use crate::query::{QueryKey, ResourceRequest};

/// Headlines shown at once
pub const NEWS_DISPLAY_LIMIT: usize = 10;

pub struct News;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NewsCategory {
    #[default]
    General,
    Business,
    Technology,
    Sports,
    Entertainment,
    Health,
    Science,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 7] = [
        NewsCategory::General,
        NewsCategory::Business,
        NewsCategory::Technology,
        NewsCategory::Sports,
        NewsCategory::Entertainment,
        NewsCategory::Health,
        NewsCategory::Science,
    ];

    /// Wire value for the `category` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::General => "general",
            NewsCategory::Business => "business",
            NewsCategory::Technology => "technology",
            NewsCategory::Sports => "sports",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::Health => "health",
            NewsCategory::Science => "science",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NewsCategory::General => "General",
            NewsCategory::Business => "Business",
            NewsCategory::Technology => "Technology",
            NewsCategory::Sports => "Sports",
            NewsCategory::Entertainment => "Entertainment",
            NewsCategory::Health => "Health",
            NewsCategory::Science => "Science",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NewsCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        NewsCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown news category '{}'. Valid values: {}",
                    s,
                    NewsCategory::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

impl Resource for News {
    type Params = NewsCategory;
    type Payload = NewsFeed;

    const NAME: &'static str = "news";
    const TRIGGER: TriggerMode = TriggerMode::OnMount;
    const DEFAULT_FRESHNESS: Option<std::time::Duration> = None;
    const FAILURE_MESSAGE: &'static str =
        "Could not load the news. Check that the news API key is configured.";

    fn key(params: &NewsCategory) -> Option<QueryKey> {
        Some(QueryKey::new(Self::NAME, [params.as_str()]))
    }

    fn request(params: &NewsCategory) -> ResourceRequest {
        ResourceRequest::get("/news").param("category", params.as_str())
    }

    fn initial_params() -> Option<NewsCategory> {
        Some(NewsCategory::General)
    }
}

impl Payload for NewsFeed {
    fn empty() -> Self {
        NewsFeed::default()
    }

    fn item_count(&self) -> usize {
        self.articles.len()
    }
}

impl Filterable for Article {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn facet_values(&self, kind: FacetKind) -> Vec<&str> {
        match kind {
            FacetKind::Source if !self.source.name.is_empty() => vec![self.source.name.as_str()],
            _ => Vec::new(),
        }
    }
}

/// Age of a headline as the card shows it: minutes under an hour, hours under
/// a day, days under a week, otherwise the calendar date.
pub fn relative_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(published);
    let minutes = age.num_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{} days ago", days)
    } else {
        published.format("%d/%m/%Y").to_string()
    }
}
