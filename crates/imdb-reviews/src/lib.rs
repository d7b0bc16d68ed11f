//! imdb-reviews — movie catalog lookup, fuzzy title resolution, and review
//! extraction from rendered IMDb listing pages.

pub mod catalog;
pub mod extract;
pub mod fuzzy;
pub mod output;
pub mod resolve;
pub mod types;

pub use catalog::Catalog;
pub use extract::{extract_reviews, parse_rating, parse_review_total, ReviewSelectors};
pub use fuzzy::{match_score, search, FuzzyMatch};
pub use output::{output_file_name, output_path, read_reviews, write_reviews};
pub use resolve::resolve;
pub use types::*;
