//! Data transfer objects for web requests and responses.
//!
//! Scraped records are serialized as-is; these types only cover the
//! endpoints that don't return a domain record.

use serde::{Deserialize, Serialize};

use crate::stations::StationMatch;

/// Index response: server time and the available endpoints.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Current UTC time as an HTTP date
    pub datetime: String,

    pub methods: Methods,
}

/// Path templates of the API endpoints.
#[derive(Debug, Serialize)]
pub struct Methods {
    pub station_list: &'static str,
    pub station_details: &'static str,
    pub departures: &'static str,
    pub line_details: &'static str,
    pub schedules: &'static str,
    pub station_search: &'static str,
}

impl Default for Methods {
    fn default() -> Self {
        Self {
            station_list: "/stations/",
            station_details: "/stations/{station_id}/",
            departures: "/stations/{station_id}/departures/",
            line_details: "/stations/{station_id}/lines/{line_id}/",
            schedules: "/stations/{station_id}/schedules/",
            station_search: "/api/stations/search?q={query}",
        }
    }
}

/// Request to search stations by name.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Search query
    pub q: String,

    /// Maximum results (defaults to 10, capped at 50)
    pub limit: Option<usize>,
}

/// A station in search results.
#[derive(Debug, Serialize)]
pub struct StationSearchResult {
    pub id: u32,
    pub name: String,
}

impl From<StationMatch> for StationSearchResult {
    fn from(m: StationMatch) -> Self {
        Self {
            id: m.id.get(),
            name: m.name,
        }
    }
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationSearchResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Format a time the way HTTP headers do, e.g. `Thu, 15 Oct 2026 07:28:00 GMT`.
pub fn http_date(time: chrono::DateTime<chrono::Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
