//! Static movie catalog loaded once at startup.

use std::path::Path;

use crate::types::{CatalogEntry, ReviewError, ReviewResult};

/// Read-only list of known movies, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from in-memory entries.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog from a JSON file holding an array of `{ id, title, .. }`.
    pub fn load(path: &Path) -> ReviewResult<Self> {
        let data = std::fs::read(path).map_err(|e| {
            ReviewError::Catalog(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&data)
            .map_err(|e| ReviewError::Catalog(format!("{}: {e}", path.display())))
    }

    /// Parse a catalog from JSON bytes.
    pub fn from_json(data: &[u8]) -> ReviewResult<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_slice(data)?;
        tracing::debug!(entries = entries.len(), "catalog loaded");
        Ok(Self { entries })
    }

    /// Entry whose identifier equals `id` exactly.
    pub fn find_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"tt0111161","title":"The Shawshank Redemption"}},
                {{"id":"tt0068646","title":"The Godfather","year":1972}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find_by_id("tt0068646").map(|e| e.title.as_str()),
            Some("The Godfather")
        );
    }

    #[test]
    fn test_find_by_id_is_case_sensitive() {
        let catalog =
            Catalog::from_entries(vec![CatalogEntry::new("tt0111161", "The Shawshank Redemption")]);
        assert!(catalog.find_by_id("TT0111161").is_none());
        assert!(catalog.find_by_id("tt0111161").is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/imdb_movie_data.json")).unwrap_err();
        assert!(matches!(err, ReviewError::Catalog(_)));
    }

    #[test]
    fn test_rejects_non_array() {
        let err = Catalog::from_json(br#"{"id":"tt1"}"#).unwrap_err();
        assert!(matches!(err, ReviewError::Json(_)));
    }
}
