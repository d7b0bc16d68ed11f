//! Review file naming, writing and reading.

use std::path::{Path, PathBuf};

use crate::types::{ReviewError, ReviewRecord, ReviewResult};

/// File name for the reviews of movie `id`.
pub fn output_file_name(id: &str) -> String {
    format!("imdb_ratings_{id}.json")
}

/// Full output path for movie `id` inside `dir`.
pub fn output_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(output_file_name(id))
}

/// Write all reviews as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn write_reviews(path: &Path, reviews: &[ReviewRecord]) -> ReviewResult<()> {
    let payload = serde_json::to_string_pretty(reviews)?;

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, payload.as_bytes())
    };

    write().map_err(|source| ReviewError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a review file written by [`write_reviews`].
pub fn read_reviews(path: &Path) -> ReviewResult<Vec<ReviewRecord>> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(output_file_name("tt0111161"), "imdb_ratings_tt0111161.json");
        assert_eq!(
            output_path(Path::new("data"), "tt0111161"),
            PathBuf::from("data/imdb_ratings_tt0111161.json")
        );
    }

    #[test]
    fn test_write_creates_directory_and_indents() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(&dir.path().join("data"), "tt1");
        let reviews = vec![ReviewRecord {
            date: "2 March 2019".into(),
            author: "critic".into(),
            title: "Great".into(),
            rating: 9,
            text: "Loved <i>it</i>".into(),
        }];

        write_reviews(&path, &reviews).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("[\n  {\n    \"date\""));
    }

    #[test]
    fn test_write_failure_is_output_write() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file cannot be used as a directory
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = output_path(&blocker, "tt1");

        let err = write_reviews(&path, &[]).unwrap_err();
        match err {
            ReviewError::OutputWrite { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
