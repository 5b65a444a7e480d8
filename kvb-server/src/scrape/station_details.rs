//! Station detail extraction: which lines serve a station.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::domain::{LineId, StationDetails, StationId};
use crate::stations::StationSnapshot;

use super::error::ScrapeError;
use super::normalize::path_segment;
use super::urls::SHOWLINE_SEGMENT;

static INFO_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.info-list").expect("static selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Segment of a showline link holding the line id.
const LINE_SEGMENT: usize = 4;

/// Extract the lines serving `station` from its detail page.
///
/// The name comes from the startup snapshot, not the page. Lines are read
/// from links to `/haltestellen/showline/{station}/{line}/` inside the
/// `ul.info-list` container, in page order with duplicates kept.
///
/// # Errors
///
/// - [`ScrapeError::UnknownStation`] if the snapshot doesn't know `station`
/// - [`ScrapeError::MalformedPage`] if the page has no `ul.info-list`
pub fn extract_station_details(
    station: StationId,
    html: &str,
    snapshot: &StationSnapshot,
) -> Result<StationDetails, ScrapeError> {
    let name = snapshot.name(station)?.to_string();

    let document = Html::parse_document(html);
    let info_list = document
        .select(&INFO_LIST)
        .next()
        .ok_or_else(|| ScrapeError::malformed("station details", "no ul.info-list container"))?;

    let own_lines = format!("{SHOWLINE_SEGMENT}{station}/");
    let line_ids = info_list
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !href.contains(&own_lines) {
                return None;
            }
            let segment = path_segment(href, LINE_SEGMENT)?;
            LineId::parse(segment)
                .inspect_err(|e| tracing::trace!(href, error = %e, "skipping line link"))
                .ok()
        })
        .collect();

    Ok(StationDetails {
        station_id: station,
        name,
        line_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(n: u32) -> StationId {
        StationId::new(n).unwrap()
    }

    fn snapshot() -> StationSnapshot {
        StationSnapshot::new(
            [(sid(8), "Neumarkt".to_string()), (sid(12), "Main Square".to_string())]
                .into_iter()
                .collect(),
        )
    }

    fn line_numbers(details: &StationDetails) -> Vec<u32> {
        details.line_ids.iter().map(|l| l.get()).collect()
    }

    #[test]
    fn extracts_lines_in_page_order() {
        let html = r#"
            <ul class="info-list">
              <li><a href="/haltestellen/showline/8/16/">16</a></li>
              <li><a href="/haltestellen/showline/8/1/">1</a></li>
              <li><a href="/haltestellen/showline/8/16/">16</a></li>
            </ul>
        "#;

        let details = extract_station_details(sid(8), html, &snapshot()).unwrap();
        assert_eq!(details.station_id, sid(8));
        assert_eq!(details.name, "Neumarkt");
        assert_eq!(line_numbers(&details), vec![16, 1, 16]);
    }

    #[test]
    fn ignores_links_outside_container_and_for_other_stations() {
        let html = r#"
            <a href="/haltestellen/showline/8/9/">outside</a>
            <ul class="nav info-list">
              <li><a href="/haltestellen/showline/80/3/">other station</a></li>
              <li><a href="/haltestellen/overview/8/">self</a></li>
              <li><a>no href</a></li>
              <li><a href="/haltestellen/showline/8/7/">7</a></li>
            </ul>
        "#;

        let details = extract_station_details(sid(8), html, &snapshot()).unwrap();
        assert_eq!(line_numbers(&details), vec![7]);
    }

    #[test]
    fn skips_non_numeric_line_segment() {
        let html = r#"
            <ul class="info-list">
              <li><a href="/haltestellen/showline/8/E/">E</a></li>
              <li><a href="/haltestellen/showline/8/5/">5</a></li>
            </ul>
        "#;

        let details = extract_station_details(sid(8), html, &snapshot()).unwrap();
        assert_eq!(line_numbers(&details), vec![5]);
    }

    #[test]
    fn empty_container_is_no_lines() {
        let html = r#"<ul class="info-list"><li>Keine Linien</li></ul>"#;
        let details = extract_station_details(sid(12), html, &snapshot()).unwrap();
        assert_eq!(details.name, "Main Square");
        assert!(details.line_ids.is_empty());
    }

    #[test]
    fn missing_container_is_malformed() {
        let html = r#"<ul class="menu"><li><a href="/haltestellen/showline/8/1/">1</a></li></ul>"#;
        let err = extract_station_details(sid(8), html, &snapshot()).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::MalformedPage {
                page: "station details",
                ..
            }
        ));
    }

    #[test]
    fn unknown_station_is_rejected() {
        let html = r#"<ul class="info-list"></ul>"#;
        let err = extract_station_details(sid(999), html, &snapshot()).unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownStation(id) if id == sid(999)));
    }

    #[test]
    fn unknown_station_with_empty_snapshot() {
        let empty = StationSnapshot::default();
        let err = extract_station_details(sid(8), "", &empty).unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownStation(_)));
    }
}
