//! Core domain types for the KVB scraper.
//!
//! Identifiers are validated newtypes; records are plain immutable values
//! produced by the extractors in [`crate::scrape`].

mod ids;
mod records;

pub use ids::{InvalidId, LineId, StationId};
pub use records::{
    Departure, LineDetails, LineLabel, ScheduleLinks, StationDetails, StationList,
};
