//! Turn a free-text query into the movie whose reviews will be fetched.

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::fuzzy;
use crate::types::{
    CatalogEntry, Resolution, ResolveMethod, ResolvedTarget, ReviewError, ReviewResult,
};

/// Resolve `query` against the catalog.
///
/// An identifier match is authoritative and skips title matching. Otherwise
/// the best fuzzy title match wins, and when nothing matches the query is used
/// as an identifier as-is.
pub fn resolve(query: &str, catalog: &Catalog) -> ReviewResult<Resolution> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ReviewError::InputMissing);
    }

    if let Some(entry) = catalog.find_by_id(query) {
        return finish(
            query,
            Resolution {
                target: entry.into(),
                method: ResolveMethod::Exact,
                candidates: Vec::new(),
            },
        );
    }

    info!("Parameter \"{query}\" does not match any movie ID, trying title match..");
    let candidates: Vec<CatalogEntry> = fuzzy::search(catalog.entries(), query)
        .into_iter()
        .map(|m| m.entry.clone())
        .collect();

    let resolution = match candidates.first() {
        Some(best) => {
            if candidates.len() > 1 {
                warn!(
                    "More than one result, picking the first entry of:\n{}",
                    pretty(&candidates)
                );
            }
            Resolution {
                target: best.into(),
                method: ResolveMethod::Fuzzy,
                candidates,
            }
        }
        None => {
            warn!("Parameter \"{query}\" does not match any title, setting it as movie ID.");
            Resolution {
                target: ResolvedTarget {
                    id: query.to_string(),
                    title: None,
                },
                method: ResolveMethod::Raw,
                candidates,
            }
        }
    };

    finish(query, resolution)
}

fn finish(query: &str, resolution: Resolution) -> ReviewResult<Resolution> {
    if resolution.target.id.trim().is_empty() {
        return Err(ReviewError::NotFound(query.to_string()));
    }
    Ok(resolution)
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
