//! Station list extraction from the overview page.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::domain::{StationId, StationList};

use super::normalize::{path_segment, text_of};
use super::urls::OVERVIEW_SEGMENT;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Segment of an overview link holding the station id.
const STATION_SEGMENT: usize = 3;

/// Extract the station id → name mapping from the overview page.
///
/// Every anchor linking to `/haltestellen/overview/{id}/` is a candidate; its
/// text, as it appears on the page, is the station name. Candidates are sorted by id (stable) and folded
/// into the mapping, so for a repeated id the name of its last occurrence in
/// the page wins. A page without candidates yields an empty list.
pub fn extract_station_list(html: &str) -> StationList {
    let document = Html::parse_document(html);

    let mut candidates: Vec<(StationId, String)> = document
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !href.contains(OVERVIEW_SEGMENT) {
                return None;
            }
            let segment = path_segment(href, STATION_SEGMENT)?;
            match StationId::parse(segment) {
                Ok(id) => Some((id, text_of(a))),
                Err(e) => {
                    tracing::trace!(href, error = %e, "skipping overview link without station id");
                    None
                }
            }
        })
        .collect();

    candidates.sort_by_key(|(id, _)| *id);
    candidates.into_iter().collect()
}
