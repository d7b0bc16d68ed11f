//! Core data types for catalog lookup and extracted reviews.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A movie in the reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    /// Any further fields of the catalog record (year, rank, ...), kept so
    /// diagnostics can show the full entry.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CatalogEntry {
    /// Create an entry with no extra fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// The movie whose reviews will be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub id: String,
    /// Absent when the query was used as a raw identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl From<&CatalogEntry> for ResolvedTarget {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: Some(entry.title.clone()),
        }
    }
}

/// How a query was turned into a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMethod {
    /// The query equals a catalog identifier.
    Exact,
    /// The query fuzzy-matched one or more catalog titles.
    Fuzzy,
    /// Nothing matched; the query itself is the identifier.
    Raw,
}

/// Outcome of resolving a query against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub target: ResolvedTarget,
    pub method: ResolveMethod,
    /// Ranked fuzzy matches, best first. Empty unless `method` is `Fuzzy`.
    pub candidates: Vec<CatalogEntry>,
}

/// A single user review extracted from the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub date: String,
    pub author: String,
    pub title: String,
    /// Star rating, 0 when the reviewer gave none.
    #[serde(default)]
    pub rating: i32,
    /// Review body as rendered markup.
    pub text: String,
}

/// A review field that must be present on every listing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    Date,
    Author,
    Title,
    Text,
}

impl std::fmt::Display for ReviewField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Author => write!(f, "author"),
            Self::Title => write!(f, "title"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Errors that can occur while resolving, extracting or saving reviews.
#[derive(thiserror::Error, Debug)]
pub enum ReviewError {
    #[error("No parameters given. Please supply either IMDb movie ID or (partial) title.")]
    InputMissing,

    #[error("Could not find movie for given parameter \"{0}\"")]
    NotFound(String),

    #[error("Review item {index} has no {field} element")]
    MalformedItem { index: usize, field: ReviewField },

    #[error("Failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type ReviewResult<T> = Result<T, ReviewError>;
