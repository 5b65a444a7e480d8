//! Station snapshot and name lookup.
//!
//! Provides the station id → name mapping, fetched from the KVB overview
//! page once at startup.

mod snapshot;

pub use snapshot::{StationMatch, StationSnapshot};
