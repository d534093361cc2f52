//! Book search card

use dashboard_types::{Book, BookSearch};

use super::{Resource, TriggerMode};
use crate::envelope::Payload;
use crate::filter::{FacetKind, Filterable};
use crate::query::{QueryKey, ResourceRequest};

pub const DEFAULT_LIMIT: u32 = 10;

pub struct Books;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooksQuery {
    pub q: String,
    pub limit: u32,
}

impl BooksQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

impl Resource for Books {
    type Params = BooksQuery;
    type Payload = BookSearch;

    const NAME: &'static str = "books";
    const TRIGGER: TriggerMode = TriggerMode::OnInput;
    const DEFAULT_FRESHNESS: Option<std::time::Duration> = None;
    const FAILURE_MESSAGE: &'static str = "Could not search books. Please try again.";

    fn key(params: &BooksQuery) -> Option<QueryKey> {
        let q = params.q.trim();
        if q.is_empty() {
            return None;
        }
        Some(QueryKey::new(Self::NAME, [q.to_string(), params.limit.to_string()]))
    }

    fn request(params: &BooksQuery) -> ResourceRequest {
        ResourceRequest::get("/books/search")
            .param("q", params.q.trim())
            .param("limit", params.limit)
    }
}

impl Payload for BookSearch {
    fn empty() -> Self {
        BookSearch::default()
    }

    fn item_count(&self) -> usize {
        self.books.len()
    }
}

impl Filterable for Book {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.author_name.iter().map(String::as_str));
        fields
    }

    fn facet_values(&self, kind: FacetKind) -> Vec<&str> {
        match kind {
            FacetKind::Subject => self.subject.iter().map(String::as_str).collect(),
            FacetKind::Region | FacetKind::IncomeLevel | FacetKind::Source => Vec::new(),
        }
    }
}
