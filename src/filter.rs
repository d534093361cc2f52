//! Client-side filter and show-more window
//!
//! Everything here is a pure function of `(items, criteria, window)`. The
//! source list is only borrowed, and recomputing with the same inputs always
//! yields the same sequence.

use std::collections::BTreeSet;

/// Categorical dimension a card can narrow on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Region,
    IncomeLevel,
    Subject,
    Source,
}

/// Exact-match facet selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub kind: FacetKind,
    pub value: String,
}

impl Facet {
    /// `None` for the "all" chip or a blank value
    pub fn select(kind: FacetKind, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(Self {
                kind,
                value: trimmed.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub term: String,
    /// At most one selection per kind; all of them must match
    pub facets: Vec<Facet>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Select `value` for `kind`, replacing any earlier selection of the same
    /// kind. "all" clears that kind only.
    pub fn with_facet(mut self, kind: FacetKind, value: impl Into<String>) -> Self {
        self.facets.retain(|facet| facet.kind != kind);
        self.facets.extend(Facet::select(kind, value));
        self
    }

    pub fn facet(&self, kind: FacetKind) -> Option<&Facet> {
        self.facets.iter().find(|facet| facet.kind == kind)
    }

    fn needle(&self) -> Option<String> {
        let term = self.term.trim();
        if term.is_empty() {
            None
        } else {
            Some(term.to_lowercase())
        }
    }
}

/// Items a card can search and facet over
pub trait Filterable {
    /// Text fields the free-text term is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Values this item carries for `kind`; empty when it has none
    fn facet_values(&self, kind: FacetKind) -> Vec<&str>;

    fn matches(&self, criteria: &FilterCriteria) -> bool {
        let term_ok = match criteria.needle() {
            None => true,
            Some(needle) => self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle)),
        };
        let facet_ok = criteria.facets.iter().all(|facet| {
            self.facet_values(facet.kind)
                .iter()
                .any(|value| *value == facet.value)
        });
        term_ok && facet_ok
    }
}

/// Prefix window toggled by "show more" / "show less"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: usize,
    pub expanded: bool,
}

impl Window {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            expanded: false,
        }
    }

    /// No windowing at all
    pub fn unbounded() -> Self {
        Self {
            limit: usize::MAX,
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a, T> {
    /// Items to render, in source order
    pub items: Vec<&'a T>,
    /// Matches before windowing
    pub total_matches: usize,
    /// More matches exist than the collapsed window shows. Stays true while
    /// expanded so the toggle remains visible.
    pub has_more: bool,
}

impl<T> FilteredView<'_, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Matches hidden by the collapsed window
    pub fn hidden(&self) -> usize {
        self.total_matches - self.items.len()
    }
}

pub fn apply<'a, T: Filterable>(
    items: &'a [T],
    criteria: &FilterCriteria,
    window: &Window,
) -> FilteredView<'a, T> {
    let matched: Vec<&T> = items.iter().filter(|item| item.matches(criteria)).collect();
    let total_matches = matched.len();
    let has_more = total_matches > window.limit;
    let items = if window.expanded {
        matched
    } else {
        matched.into_iter().take(window.limit).collect()
    };
    FilteredView {
        items,
        total_matches,
        has_more,
    }
}

/// Sorted distinct facet values present in `items`
pub fn distinct_facet_values<T: Filterable>(items: &[T], kind: FacetKind) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.facet_values(kind))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
