//! KVB departure server.
//!
//! Scrapes stations, lines and live departures from the Kölner
//! Verkehrs-Betriebe website and serves them as JSON.

pub mod cache;
pub mod config;
pub mod domain;
pub mod scrape;
pub mod stations;
pub mod web;
