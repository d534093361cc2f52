//! Open Library search results

use serde::{Deserialize, Serialize};

const COVERS_BASE: &str = "https://covers.openlibrary.org/b/id";

/// Result of `GET /books/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookSearch {
    /// Total hits reported upstream (may exceed `books.len()`)
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub offset: u64,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub books: Vec<Book>,
    /// Echo of the search term
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Open Library work key, e.g. `/works/OL1168083W`
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub isbn: Vec<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub language: Vec<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub subject: Vec<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub publisher: Vec<String>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u64>,
}

impl Book {
    /// Cover image URL, falling back to the medium cover derived from `cover_i`
    pub fn cover(&self) -> Option<String> {
        self.cover_url
            .clone()
            .or_else(|| self.cover_i.map(|id| format!("{}/{}-M.jpg", COVERS_BASE, id)))
    }

    /// Authors joined for display, `None` when the record has no author
    pub fn authors(&self) -> Option<String> {
        if self.author_name.is_empty() {
            None
        } else {
            Some(self.author_name.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_book_decodes() {
        let book: Book = serde_json::from_value(serde_json::json!({ "title": "1984" })).unwrap();
        assert_eq!(book.title, "1984");
        assert!(book.author_name.is_empty());
        assert_eq!(book.authors(), None);
    }

    #[test]
    fn test_cover_falls_back_to_cover_id() {
        let book = Book {
            cover_i: Some(8575708),
            ..Default::default()
        };
        assert_eq!(
            book.cover().as_deref(),
            Some("https://covers.openlibrary.org/b/id/8575708-M.jpg")
        );

        let explicit = Book {
            cover_i: Some(1),
            cover_url: Some("https://example.test/c.jpg".into()),
            ..Default::default()
        };
        assert_eq!(explicit.cover().as_deref(), Some("https://example.test/c.jpg"));
    }
}
