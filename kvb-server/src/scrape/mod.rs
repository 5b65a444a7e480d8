//! KVB website scraper.
//!
//! Fetches pages from the KVB site and turns them into domain records.
//!
//! Key characteristics of the site:
//! - There is no API; everything is scraped from HTML meant for browsers
//! - Requests without a desktop browser user-agent are blocked
//! - Station and line ids only exist as URL path segments, so extraction
//!   works on link targets rather than visible text
//!
//! Extractors are pure functions over the page source. They either return a
//! complete record or a [`ScrapeError`]; fragments that don't match the
//! expected markup are skipped, missing page structure is an error.

mod client;
mod departures;
mod error;
mod lines;
pub mod normalize;
mod station_details;
mod stations;
pub mod urls;

pub use client::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, KvbClient, KvbConfig, PageSource};
pub use departures::{IMMEDIATE, ImmediateDepartures, extract_departures};
pub use error::ScrapeError;
pub use lines::extract_line_details;
pub use normalize::{normalize_wait_time, parse_int_or_keep_text};
pub use station_details::extract_station_details;
pub use stations::extract_station_list;
