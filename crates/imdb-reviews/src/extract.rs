//! Review extraction from the rendered listing page.
//!
//! The listing is rendered by a browser and handed over as HTML; everything
//! here is synchronous because `scraper` types are `!Send`. Items are
//! returned in document order.

use scraper::{ElementRef, Html, Selector};

use crate::types::{ReviewError, ReviewField, ReviewRecord, ReviewResult};

/// CSS selectors for the review listing page.
#[derive(Debug, Clone)]
pub struct ReviewSelectors {
    /// Element holding the total review count.
    pub total: String,
    /// One element per review.
    pub item: String,
    /// The "load more" trigger.
    pub load_more: String,
    // Per item, relative to `item`.
    pub rating: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub text: String,
}

impl Default for ReviewSelectors {
    fn default() -> Self {
        Self {
            total: "#main > section > div.lister > div.header > div > span".to_string(),
            item: ".lister-item".to_string(),
            load_more: "#load-more-trigger".to_string(),
            rating: ".ipl-ratings-bar > span > span:nth-child(2)".to_string(),
            title: ".title".to_string(),
            author: "div > div.lister-item-content > div.display-name-date > span.display-name-link > a"
                .to_string(),
            date: ".review-date".to_string(),
            text: "div > div.lister-item-content > div.content > div.text".to_string(),
        }
    }
}

struct Compiled {
    item: Selector,
    rating: Selector,
    title: Selector,
    author: Selector,
    date: Selector,
    text: Selector,
}

impl Compiled {
    fn new(sel: &ReviewSelectors) -> ReviewResult<Self> {
        Ok(Self {
            item: parse_selector(&sel.item)?,
            rating: parse_selector(&sel.rating)?,
            title: parse_selector(&sel.title)?,
            author: parse_selector(&sel.author)?,
            date: parse_selector(&sel.date)?,
            text: parse_selector(&sel.text)?,
        })
    }
}

/// Extract one record per listing item from a rendered page.
///
/// A missing rating becomes `0`. A missing date, author, title or text
/// element fails the whole extraction with [`ReviewError::MalformedItem`].
pub fn extract_reviews(html: &str, selectors: &ReviewSelectors) -> ReviewResult<Vec<ReviewRecord>> {
    let compiled = Compiled::new(selectors)?;
    let document = Html::parse_document(html);

    document
        .select(&compiled.item)
        .enumerate()
        .map(|(index, item)| extract_item(index, &item, &compiled))
        .collect()
}

fn extract_item(index: usize, item: &ElementRef<'_>, sel: &Compiled) -> ReviewResult<ReviewRecord> {
    let rating = item
        .select(&sel.rating)
        .next()
        .map(|el| parse_rating(&element_text(&el)))
        .unwrap_or(0);

    let text = item
        .select(&sel.text)
        .next()
        .map(|el| el.inner_html())
        .ok_or(ReviewError::MalformedItem {
            index,
            field: ReviewField::Text,
        })?;

    Ok(ReviewRecord {
        date: required_text(index, item, &sel.date, ReviewField::Date)?,
        author: required_text(index, item, &sel.author, ReviewField::Author)?,
        title: required_text(index, item, &sel.title, ReviewField::Title)?,
        rating,
        text,
    })
}

fn required_text(
    index: usize,
    item: &ElementRef<'_>,
    selector: &Selector,
    field: ReviewField,
) -> ReviewResult<String> {
    item.select(selector)
        .next()
        .map(|el| element_text(&el))
        .ok_or(ReviewError::MalformedItem { index, field })
}

/// Parse the leading integer of a rating indicator, `0` if there is none.
pub fn parse_rating(text: &str) -> i32 {
    leading_integer(text)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(0)
}

/// Parse the total review count hint, e.g. `"12,345 Reviews"` → `12345`.
pub fn parse_review_total(text: &str) -> Option<u64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    leading_integer(&cleaned).and_then(|n| u64::try_from(n).ok())
}

/// Leading base-10 integer after optional whitespace and sign.
fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn parse_selector(css: &str) -> ReviewResult<Selector> {
    Selector::parse(css).map_err(|e| ReviewError::Selector(format!("{css}: {e}")))
}

/// Visible text of an element, trimmed and whitespace-collapsed.
///
/// Adjacent text nodes are concatenated as-is, so inline markup such as
/// `Great<i>!</i>` reads `Great!`.
fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("8"), 8);
        assert_eq!(parse_rating(" 10 "), 10);
        assert_eq!(parse_rating("7/10"), 7);
        assert_eq!(parse_rating(""), 0);
        assert_eq!(parse_rating("n/a"), 0);
    }

    #[test]
    fn test_parse_review_total() {
        assert_eq!(parse_review_total("9,876 Reviews"), Some(9876));
        assert_eq!(parse_review_total("1,234,567"), Some(1234567));
        assert_eq!(parse_review_total("42"), Some(42));
        assert_eq!(parse_review_total("Reviews"), None);
    }

    #[test]
    fn test_invalid_selector() {
        let selectors = ReviewSelectors {
            item: "[[".to_string(),
            ..ReviewSelectors::default()
        };
        let err = extract_reviews("<html></html>", &selectors).unwrap_err();
        assert!(matches!(err, ReviewError::Selector(_)));
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let html = r#"<html><body>
<div class="lister-item">
  <div class="review-container">
    <div class="lister-item-content">
      <a class="title"> Great<i>!</i>
</a>
      <div class="display-name-date">
        <span class="display-name-link"><a href="/user/ur1/">Jo<b>hn</b></a></span>
        <span class="review-date">3 March 2019</span>
      </div>
      <div class="content"><div class="text">Loved <em>every</em> minute.</div></div>
    </div>
  </div>
</div>
</body></html>"#;
        let records = extract_reviews(html, &ReviewSelectors::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Great!");
        assert_eq!(records[0].author, "John");
        assert_eq!(records[0].date, "3 March 2019");
        assert_eq!(records[0].text, "Loved <em>every</em> minute.");
    }

    #[test]
    fn test_empty_listing() {
        let records = extract_reviews("<html><body></body></html>", &ReviewSelectors::default())
            .unwrap();
        assert!(records.is_empty());
    }
}
