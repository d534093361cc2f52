//! Top headlines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of `GET /news?category=`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsFeed {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub url: String,
    // The proxy has shipped both names for the thumbnail
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    /// RFC 3339 timestamp as sent upstream
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content_preview: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub name: String,
}

impl Article {
    /// Parsed publication time; `None` when missing or not RFC 3339
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_alias_and_published() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "title": "Launch",
            "url": "https://news.test/a",
            "image": "https://news.test/a.png",
            "published_at": "2024-03-01T12:00:00Z",
            "source": { "name": "Wire" }
        }))
        .unwrap();

        assert_eq!(article.image_url.as_deref(), Some("https://news.test/a.png"));
        assert_eq!(article.source.name, "Wire");
        assert_eq!(
            article.published().map(|dt| dt.to_rfc3339()),
            Some("2024-03-01T12:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_unparseable_date_is_none() {
        let article = Article {
            published_at: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(article.published().is_none());
    }
}
