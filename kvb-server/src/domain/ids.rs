//! Station and line identifier types.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id {input:?}: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    input: String,
    reason: &'static str,
}

fn parse_positive(kind: &'static str, s: &str) -> Result<NonZeroU32, InvalidId> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidId {
            kind,
            input: s.to_string(),
            reason: "must be a decimal number",
        });
    }

    let value: u32 = s.parse().map_err(|_| InvalidId {
        kind,
        input: s.to_string(),
        reason: "out of range",
    })?;

    NonZeroU32::new(value).ok_or_else(|| InvalidId {
        kind,
        input: s.to_string(),
        reason: "must be positive",
    })
}

/// A KVB station identifier, as found in `/haltestellen/overview/{id}/`.
///
/// Always positive. Serializes as a plain integer.
///
/// # Examples
///
/// ```
/// use kvb_server::domain::StationId;
///
/// let id = StationId::parse("12").unwrap();
/// assert_eq!(id.get(), 12);
///
/// assert!(StationId::parse("0").is_err());
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("12a").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(NonZeroU32);

impl StationId {
    /// Parse a station id from a URL path segment.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        parse_positive("station", s).map(Self)
    }

    /// Build a station id from a raw integer; `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A KVB line identifier, as found in `/haltestellen/showline/{station}/{line}/`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(NonZeroU32);

impl LineId {
    /// Parse a line id from a URL path segment.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        parse_positive("line", s).map(Self)
    }

    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
