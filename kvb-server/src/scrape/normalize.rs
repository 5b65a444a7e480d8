//! Text cleanup shared by the extractors.
//!
//! The KVB pages pad table cells with non-breaking spaces and are
//! inconsistent about case and whitespace; everything that leaves an
//! extractor goes through one of these functions.

use scraper::ElementRef;

use crate::domain::LineLabel;

/// Non-breaking space as used in the departure board cells.
pub const NBSP: char = '\u{a0}';

/// Concatenated text content of an element.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Remove every non-breaking space.
pub fn strip_nbsp(text: &str) -> String {
    text.replace(NBSP, "")
}

/// Normalize a wait-time cell: non-breaking spaces become regular spaces,
/// then trim and lowercase.
///
/// ```
/// use kvb_server::scrape::normalize_wait_time;
///
/// assert_eq!(normalize_wait_time("3\u{a0}MIN"), "3 min");
/// assert_eq!(normalize_wait_time(" Sofort "), "sofort");
/// ```
pub fn normalize_wait_time(text: &str) -> String {
    text.replace(NBSP, " ").trim().to_lowercase()
}

/// Coerce a line label to a number, keeping the text when it isn't one.
///
/// Replacement services carry labels like `"E"` or `"SEV 7"`; those are not
/// errors.
pub fn parse_int_or_keep_text(text: &str) -> LineLabel {
    match text.trim().parse::<u32>() {
        Ok(n) => LineLabel::Number(n),
        Err(_) => LineLabel::Text(text.to_string()),
    }
}

/// Path part of a link target: absolute URLs are reduced to their path and
/// query strings or fragments are dropped.
pub fn link_path(href: &str) -> &str {
    let path = match href.find("://") {
        Some(idx) => {
            let rest = &href[idx + 3..];
            rest.find('/').map_or("/", |p| &rest[p..])
        }
        None => href,
    };
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Segment `index` of a link target split on `/`.
///
/// Indices count from the empty segment before the leading slash, so in
/// `/haltestellen/overview/12/` segment 3 is `"12"`.
pub fn path_segment(href: &str, index: usize) -> Option<&str> {
    link_path(href).split('/').nth(index)
}
