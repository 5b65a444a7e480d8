//! Records produced by the extractors.
//!
//! These are immutable once built: an extraction yields a fresh value that is
//! handed to the cache or the response serializer and never modified.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{LineId, StationId};

/// Ordered station id → name mapping from the overview page.
///
/// Backed by a `BTreeMap`, so iteration is ascending by id. Serializes as a
/// JSON object keyed by the numeric id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StationList(BTreeMap<StationId, String>);

impl StationList {
    pub fn name(&self, id: StationId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate stations in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (StationId, &str)> {
        self.0.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

impl FromIterator<(StationId, String)> for StationList {
    fn from_iter<I: IntoIterator<Item = (StationId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A station's name and the lines serving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationDetails {
    pub station_id: StationId,
    pub name: String,
    /// Page order, duplicates kept.
    pub line_ids: Vec<LineId>,
}

/// The stations a line serves, split by direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDetails {
    pub station_id: StationId,
    pub line_id: LineId,
    pub stations_forward: Vec<StationId>,
    pub stations_reverse: Vec<StationId>,
}

/// Line label on the departure board.
///
/// Numeric labels become `Number`; anything else (e.g. replacement bus
/// services like `"E"`) is kept as text. Serializes untagged, so JSON carries
/// either an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LineLabel {
    Number(u32),
    Text(String),
}

/// A single live departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    pub line_id: LineLabel,
    pub direction: String,
    /// Normalized wait time, e.g. `"3 min"` or `"sofort"`.
    pub wait_time: String,
}

/// Links to the printed timetables for a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleLinks {
    pub station_id: StationId,
    pub timetable_url: String,
    pub pocket_timetable_url: String,
}
