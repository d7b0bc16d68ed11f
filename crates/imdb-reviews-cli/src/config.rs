//! Configuration loading and resolution.

use std::path::PathBuf;

use crate::collector::CollectorConfig;

/// Catalog file name looked up in the working directory and home directory.
pub const CATALOG_FILE_NAME: &str = "imdb_movie_data.json";

/// Default directory for review files.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Everything a run needs besides the query and the catalog.
#[derive(Debug, Clone)]
pub struct Settings {
    pub collector: CollectorConfig,
    /// Launch the browser without a window.
    pub headless: bool,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collector: CollectorConfig::default(),
            headless: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Resolve the catalog path.
///
/// Order: explicit flag, `IMDB_CATALOG`, `./imdb_movie_data.json`,
/// `~/.imdb-reviews/imdb_movie_data.json`.
pub fn resolve_catalog_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var("IMDB_CATALOG") {
        return PathBuf::from(env_path);
    }

    let cwd_catalog = PathBuf::from(CATALOG_FILE_NAME);
    if cwd_catalog.exists() {
        return cwd_catalog;
    }

    dirs::home_dir()
        .map(|home| home.join(".imdb-reviews").join(CATALOG_FILE_NAME))
        .unwrap_or(cwd_catalog)
}

/// Resolve the output directory: explicit flag, `IMDB_REVIEWS_OUTPUT_DIR`,
/// then `./data`.
pub fn resolve_output_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }

    std::env::var("IMDB_REVIEWS_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        assert_eq!(
            resolve_catalog_path(Some("/tmp/movies.json")),
            PathBuf::from("/tmp/movies.json")
        );
        assert_eq!(resolve_output_dir(Some("out")), PathBuf::from("out"));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.headless);
        assert_eq!(settings.output_dir, PathBuf::from("data"));
    }
}
