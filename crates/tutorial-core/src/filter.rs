//! # Title Filter
//!
//! Case-insensitive substring search over tutorial titles. An absent,
//! empty, or whitespace-only query means "no filter" and matches every
//! title. Any other query is searched for exactly as given, surrounding
//! whitespace included.

use crate::tutorial::Tutorial;

/// Predicate selecting tutorials whose title contains a needle,
/// ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    needle: Option<String>,
}

impl TitleFilter {
    /// Build a filter from an optional query string.
    pub fn new(query: Option<&str>) -> Self {
        let needle = query
            .filter(|q| !q.trim().is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    /// A filter that matches everything.
    pub fn any() -> Self {
        Self { needle: None }
    }

    /// Whether this filter restricts results at all.
    pub fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    /// The lowercased needle, if any.
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Test a raw title.
    pub fn matches_title(&self, title: &str) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => title.to_lowercase().contains(needle.as_str()),
        }
    }

    /// Test a tutorial record.
    pub fn matches(&self, tutorial: &Tutorial) -> bool {
        self.matches_title(&tutorial.title)
    }
}
