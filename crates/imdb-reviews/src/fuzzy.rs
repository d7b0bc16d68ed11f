//! Subsequence fuzzy matching of queries against catalog titles.
//!
//! A title matches when every character of the query occurs in it, in order,
//! ignoring case. Among all ways to place the query inside the title the
//! tightest placement is scored:
//!
//! - `1` when title and query are equal,
//! - `2 + span` for multi-character queries, where `span` is the distance
//!   between the first and last matched character,
//! - `2 + position` for single-character queries.
//!
//! Lower scores rank first. Equal scores keep catalog order.

use crate::types::CatalogEntry;

/// A catalog entry that matched a query.
#[derive(Debug, Clone)]
pub struct FuzzyMatch<'a> {
    pub entry: &'a CatalogEntry,
    /// Subsequence score, lower is better.
    pub score: usize,
}

/// Score `query` against `haystack`. `None` when the query is not a
/// subsequence of the haystack.
pub fn match_score(haystack: &str, query: &str) -> Option<usize> {
    let hay: Vec<char> = haystack.to_lowercase().chars().collect();
    let needle: Vec<char> = query.to_lowercase().chars().collect();
    if needle.is_empty() {
        return None;
    }

    let indexes = nearest_indexes(&hay, &needle)?;
    if hay == needle {
        return Some(1);
    }

    let first = indexes[0];
    if indexes.len() > 1 {
        let last = indexes[indexes.len() - 1];
        Some(2 + (last - first))
    } else {
        Some(2 + first)
    }
}

/// Match `query` against every entry's title, best match first.
pub fn search<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<FuzzyMatch<'a>> {
    let mut matches: Vec<FuzzyMatch<'a>> = entries
        .iter()
        .filter_map(|entry| {
            let score = match_score(&entry.title, query)?;
            Some(FuzzyMatch { entry, score })
        })
        .collect();

    // stable: equal scores keep catalog order
    matches.sort_by_key(|m| m.score);
    matches
}

/// Tightest placement of `needle` inside `hay`, as character indexes.
///
/// Tries every occurrence of the needle's first character as a start and
/// greedily places the rest. Multi-character placements are compared by
/// span, single-character ones by position; the earliest wins ties.
fn nearest_indexes(hay: &[char], needle: &[char]) -> Option<Vec<usize>> {
    let first = needle[0];
    hay.iter()
        .enumerate()
        .filter(|(_, c)| **c == first)
        .filter_map(|(start, _)| place_from(hay, needle, start))
        .min_by_key(|idx| {
            if idx.len() == 1 {
                idx[0]
            } else {
                idx[idx.len() - 1] - idx[0]
            }
        })
}

fn place_from(hay: &[char], needle: &[char], start: usize) -> Option<Vec<usize>> {
    let mut indexes = Vec::with_capacity(needle.len());
    indexes.push(start);
    let mut from = start + 1;
    for letter in &needle[1..] {
        let offset = hay.get(from..)?.iter().position(|c| c == letter)?;
        let found = from + offset;
        indexes.push(found);
        from = found + 1;
    }
    Some(indexes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsequence_matches() {
        assert!(match_score("The Shawshank Redemption", "shawshank").is_some());
        assert!(match_score("The Shawshank Redemption", "shwshnk").is_some());
        assert!(match_score("The Shawshank Redemption", "knahswahs").is_none());
        assert!(match_score("The Godfather", "").is_none());
    }

    #[test]
    fn test_exact_title_scores_one() {
        assert_eq!(match_score("Heat", "heat"), Some(1));
    }

    #[test]
    fn test_span_score() {
        // "god" at 4..=6 in "the godfather"
        assert_eq!(match_score("The Godfather", "god"), Some(4));
        // single character: earliest position wins
        assert_eq!(match_score("Alien", "e"), Some(5));
    }

    #[test]
    fn test_tightest_placement_wins() {
        // the first 'a' starts a loose placement, the later one a tight one
        assert_eq!(match_score("a....ab", "ab"), Some(3));
    }

    #[test]
    fn test_search_ranks_tighter_first() {
        let entries = vec![
            CatalogEntry::new("tt1", "Star Wars: Episode IV"),
            CatalogEntry::new("tt2", "Stargate"),
            CatalogEntry::new("tt3", "Memento"),
        ];
        let results = search(&entries, "star");
        let ids: Vec<&str> = results.iter().map(|m| m.entry.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(results[0].score <= results[1].score);
        assert!(!ids.contains(&"tt3"));
    }

    #[test]
    fn test_search_exact_title_first() {
        let entries = vec![
            CatalogEntry::new("tt1", "Alien Resurrection"),
            CatalogEntry::new("tt2", "Alien"),
        ];
        let results = search(&entries, "alien");
        assert_eq!(results[0].entry.id, "tt2");
        assert_eq!(results[0].score, 1);
    }

    #[test]
    fn test_search_ties_keep_catalog_order() {
        let entries = vec![
            CatalogEntry::new("tt1", "Up in the Air"),
            CatalogEntry::new("tt2", "Up"),
        ];
        // both titles start with "u", so both score 2
        let results = search(&entries, "u");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, results[1].score);
        assert_eq!(results[0].entry.id, "tt1");
        assert_eq!(results[1].entry.id, "tt2");

        let reversed = vec![entries[1].clone(), entries[0].clone()];
        let results = search(&reversed, "u");
        assert_eq!(results[0].entry.id, "tt2");
    }
}
