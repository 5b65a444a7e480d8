//! Scraper error types.

use crate::domain::StationId;

/// Errors from fetching or extracting a KVB page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status
    #[error("upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    /// An expected structural element is missing from the page
    #[error("malformed {page} page: {reason}")]
    MalformedPage {
        page: &'static str,
        reason: String,
    },

    /// Station id is not part of the loaded station snapshot
    #[error("unknown station {0}")]
    UnknownStation(StationId),
}

impl ScrapeError {
    pub(crate) fn malformed(page: &'static str, reason: impl Into<String>) -> Self {
        ScrapeError::MalformedPage {
            page,
            reason: reason.into(),
        }
    }

    /// Whether the upstream fetch failed, as opposed to the page content.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScrapeError::Transport { .. } | ScrapeError::UpstreamStatus { .. }
        )
    }
}
