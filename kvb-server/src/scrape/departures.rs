//! Live departure board extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::domain::{Departure, StationId};

use super::error::ScrapeError;
use super::normalize::{normalize_wait_time, parse_int_or_keep_text, strip_nbsp, text_of};

static DISPLAY_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.display").expect("static selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("static selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));

/// Normalized wait time of a vehicle that is already at the platform.
pub const IMMEDIATE: &str = "sofort";

/// What to do with departures whose wait time reads [`IMMEDIATE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImmediateDepartures {
    /// Report them like any other departure.
    #[default]
    Keep,
    /// Leave them out; the vehicle is usually gone by the time a client
    /// renders the board.
    Skip,
}

/// Extract the departure board of `station`.
///
/// Reads the first `table.display`; every row must have at least three
/// cells: line, direction, wait time.
///
/// # Errors
///
/// [`ScrapeError::MalformedPage`] if there is no display table or a row has
/// fewer than three cells. Either means the board layout changed, so the
/// whole page is rejected rather than the row skipped.
pub fn extract_departures(
    station: StationId,
    html: &str,
    immediate: ImmediateDepartures,
) -> Result<Vec<Departure>, ScrapeError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&DISPLAY_TABLE)
        .next()
        .ok_or_else(|| ScrapeError::malformed("departures", "no table.display"))?;

    let mut departures = Vec::new();
    for (index, row) in table.select(&ROW).enumerate() {
        let cells: Vec<String> = row.select(&CELL).take(3).map(text_of).collect();
        let [line, direction, wait] = cells.as_slice() else {
            return Err(ScrapeError::malformed(
                "departures",
                format!("row {index} has {} cells, expected 3", cells.len()),
            ));
        };

        let wait_time = normalize_wait_time(wait);
        if immediate == ImmediateDepartures::Skip && wait_time == IMMEDIATE {
            continue;
        }

        departures.push(Departure {
            line_id: parse_int_or_keep_text(&strip_nbsp(line)),
            direction: strip_nbsp(direction),
            wait_time,
        });
    }

    tracing::debug!(%station, count = departures.len(), "extracted departures");
    Ok(departures)
}
