//! Site paths for the KVB pages we scrape.

use crate::domain::{LineId, StationId};

/// Path fragment identifying station overview links.
pub const OVERVIEW_SEGMENT: &str = "/haltestellen/overview/";

/// Path fragment identifying line detail links.
pub const SHOWLINE_SEGMENT: &str = "/haltestellen/showline/";

/// Station overview page listing every station.
pub fn station_list() -> String {
    OVERVIEW_SEGMENT.to_string()
}

/// Detail page of a single station.
pub fn station_details(station: StationId) -> String {
    format!("{OVERVIEW_SEGMENT}{station}/")
}

/// Line page as seen from a station.
pub fn line_details(station: StationId, line: LineId) -> String {
    format!("{SHOWLINE_SEGMENT}{station}/{line}/")
}

/// Live departure board.
pub fn departures(station: StationId) -> String {
    format!("/qr/{station}/")
}

/// Printed timetable poster.
pub fn timetable(station: StationId) -> String {
    format!("/haltestellen/aushang/{station}/")
}

/// Pocket timetable.
pub fn pocket_timetable(station: StationId) -> String {
    format!("/haltestellen/miniplan/{station}/")
}
