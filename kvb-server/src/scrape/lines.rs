//! Line extraction: the stations a line serves in each direction.
//!
//! The line page lays out one table block per direction. Each block starts
//! with a cell classed `station-top`; the second such marker starts the
//! reverse direction.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::domain::{LineDetails, LineId, StationId};

use super::normalize::path_segment;
use super::urls::SHOWLINE_SEGMENT;

static STATION_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"td[class*="station"]"#).expect("static selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));

/// Class of the cell opening a direction block.
const BLOCK_MARKER: &str = "station-top";

const STATION_SEGMENT: usize = 3;
const LINE_SEGMENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

/// Extract the forward and reverse station sequences of `line`.
///
/// Cells without an anchor, and anchors not pointing at a showline page of
/// this line, are skipped; on some page variants this leaves the sequences
/// incomplete. Station ids keep page order and may repeat.
pub fn extract_line_details(station: StationId, line: LineId, html: &str) -> LineDetails {
    let document = Html::parse_document(html);

    let mut details = LineDetails {
        station_id: station,
        line_id: line,
        stations_forward: Vec::new(),
        stations_reverse: Vec::new(),
    };

    let mut direction = Direction::Forward;
    let mut markers = 0usize;

    for cell in document.select(&STATION_CELL) {
        if is_block_marker(cell) {
            markers += 1;
            if markers == 2 {
                direction = Direction::Reverse;
            }
        }

        let Some(stop) = linked_station(cell, line) else {
            continue;
        };

        match direction {
            Direction::Forward => details.stations_forward.push(stop),
            Direction::Reverse => details.stations_reverse.push(stop),
        }
    }

    if markers > 2 {
        tracing::debug!(%station, %line, markers, "line page has more than two direction blocks");
    }

    details
}

fn is_block_marker(cell: ElementRef<'_>) -> bool {
    cell.value()
        .attr("class")
        .and_then(|c| c.split_whitespace().next())
        == Some(BLOCK_MARKER)
}

/// Station id linked from a cell, if the link is a showline page of `line`.
fn linked_station(cell: ElementRef<'_>, line: LineId) -> Option<StationId> {
    let anchor = cell.select(&ANCHOR).next()?;
    let href = anchor.value().attr("href")?;
    if !href.contains(SHOWLINE_SEGMENT) {
        tracing::trace!(href, "skipping station cell without showline link");
        return None;
    }

    let linked_line = path_segment(href, LINE_SEGMENT).and_then(|s| LineId::parse(s).ok())?;
    if linked_line != line {
        return None;
    }

    path_segment(href, STATION_SEGMENT).and_then(|s| StationId::parse(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(n: u32) -> StationId {
        StationId::new(n).unwrap()
    }

    fn lid(n: u32) -> LineId {
        LineId::new(n).unwrap()
    }

    fn ids(v: &[StationId]) -> Vec<u32> {
        v.iter().map(|s| s.get()).collect()
    }

    fn cell(class: &str, station: u32, line: u32) -> String {
        format!(
            r#"<tr><td class="{class}"><a href="/haltestellen/showline/{station}/{line}/">S{station}</a></td></tr>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!("<html><body><table>{}</table></body></html>", rows.concat())
    }

    #[test]
    fn splits_at_second_marker() {
        let html = format!(
            "<html><body><table>{}{}{}</table><table>{}{}{}</table></body></html>",
            cell("station-top", 1, 5),
            cell("station", 2, 5),
            cell("station-bottom", 3, 5),
            cell("station-top", 3, 5),
            cell("station", 2, 5),
            cell("station-bottom", 1, 5),
        );

        let details = extract_line_details(sid(1), lid(5), &html);
        assert_eq!(details.station_id, sid(1));
        assert_eq!(details.line_id, lid(5));
        assert_eq!(ids(&details.stations_forward), vec![1, 2, 3]);
        assert_eq!(ids(&details.stations_reverse), vec![3, 2, 1]);
    }

    #[test]
    fn keeps_duplicates_in_page_order() {
        let html = page(&[
            cell("station-top", 4, 5),
            cell("station", 4, 5),
            cell("station", 6, 5),
            cell("station-top", 6, 5),
            cell("station", 6, 5),
        ]);

        let details = extract_line_details(sid(4), lid(5), &html);
        assert_eq!(ids(&details.stations_forward), vec![4, 4, 6]);
        assert_eq!(ids(&details.stations_reverse), vec![6, 6]);
    }

    #[test]
    fn single_block_is_all_forward() {
        let html = page(&[cell("station-top", 1, 5), cell("station", 2, 5)]);
        let details = extract_line_details(sid(1), lid(5), &html);
        assert_eq!(ids(&details.stations_forward), vec![1, 2]);
        assert!(details.stations_reverse.is_empty());
    }

    #[test]
    fn third_marker_stays_reverse() {
        let html = page(&[
            cell("station-top", 1, 5),
            cell("station-top", 2, 5),
            cell("station-top", 3, 5),
            cell("station", 4, 5),
        ]);

        let details = extract_line_details(sid(1), lid(5), &html);
        assert_eq!(ids(&details.stations_forward), vec![1]);
        assert_eq!(ids(&details.stations_reverse), vec![2, 3, 4]);
    }

    #[test]
    fn marker_must_be_first_class() {
        // "station station-top" is a station cell but not a block marker
        let html = page(&[
            cell("station-top", 1, 5),
            cell("station station-top", 2, 5),
            cell("station", 3, 5),
        ]);

        let details = extract_line_details(sid(1), lid(5), &html);
        assert_eq!(ids(&details.stations_forward), vec![1, 2, 3]);
        assert!(details.stations_reverse.is_empty());
    }

    #[test]
    fn marker_cell_without_anchor_still_counts() {
        let html = page(&[
            cell("station-top", 1, 5),
            r#"<tr><td class="station-top">Richtung Bocklemünd</td></tr>"#.to_string(),
            cell("station", 2, 5),
        ]);

        let details = extract_line_details(sid(1), lid(5), &html);
        assert_eq!(ids(&details.stations_forward), vec![1]);
        assert_eq!(ids(&details.stations_reverse), vec![2]);
    }

    #[test]
    fn skips_other_lines_and_foreign_links() {
        let html = page(&[
            cell("station-top", 1, 5),
            cell("station", 2, 16),
            r#"<tr><td class="station"><a href="/haltestellen/overview/3/">S3</a></td></tr>"#
                .to_string(),
            r#"<tr><td class="station"><a>S4</a></td></tr>"#.to_string(),
            r#"<tr><td class="station"><a href="/haltestellen/showline/x/5/">Sx</a></td></tr>"#
                .to_string(),
            cell("station", 5, 5),
        ]);

        let details = extract_line_details(sid(1), lid(5), &html);
        assert_eq!(ids(&details.stations_forward), vec![1, 5]);
    }

    #[test]
    fn ignores_cells_without_station_class() {
        let html = page(&[
            r#"<tr><td class="time"><a href="/haltestellen/showline/9/5/">9</a></td></tr>"#
                .to_string(),
            r#"<tr><td><a href="/haltestellen/showline/8/5/">8</a></td></tr>"#.to_string(),
            cell("station", 7, 5),
        ]);

        let details = extract_line_details(sid(7), lid(5), &html);
        assert_eq!(ids(&details.stations_forward), vec![7]);
    }

    #[test]
    fn empty_page_gives_empty_sequences() {
        let details = extract_line_details(sid(1), lid(5), &page(&[]));
        assert!(details.stations_forward.is_empty());
        assert!(details.stations_reverse.is_empty());
    }
}
