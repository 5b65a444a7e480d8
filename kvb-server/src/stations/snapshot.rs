//! The station id → name snapshot loaded at startup.

use crate::domain::{StationId, StationList};
use crate::scrape::{PageSource, ScrapeError, extract_station_list, urls};

/// Immutable station lookup, built once before serving requests.
///
/// Station detail pages don't carry a usable name, so the name is
/// cross-referenced from here by id.
#[derive(Debug, Clone, Default)]
pub struct StationSnapshot {
    stations: StationList,
}

/// A station search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationMatch {
    pub id: StationId,
    pub name: String,
}

impl StationSnapshot {
    pub fn new(stations: StationList) -> Self {
        Self { stations }
    }

    /// Fetch the overview page and extract the snapshot from it.
    pub async fn load<S: PageSource>(source: &S) -> Result<Self, ScrapeError> {
        let html = source.fetch(&urls::station_list()).await?;
        Ok(Self::new(extract_station_list(&html)))
    }

    /// Name of a station.
    pub fn name(&self, id: StationId) -> Result<&str, ScrapeError> {
        self.stations
            .name(id)
            .ok_or(ScrapeError::UnknownStation(id))
    }

    /// Case-insensitive substring search over names, ascending by id.
    pub fn search(&self, query: &str, limit: usize) -> Vec<StationMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.stations
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .take(limit)
            .map(|(id, name)| StationMatch {
                id,
                name: name.to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sid(n: u32) -> StationId {
        StationId::new(n).unwrap()
    }

    fn list(entries: &[(u32, &str)]) -> StationList {
        entries
            .iter()
            .map(|(id, name)| (sid(*id), name.to_string()))
            .collect()
    }

    /// Serves one overview page and counts fetches.
    struct OverviewPage {
        html: Option<&'static str>,
        fetches: AtomicUsize,
    }

    impl PageSource for OverviewPage {
        async fn fetch(&self, path: &str) -> Result<String, ScrapeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.html {
                Some(html) if path == "/haltestellen/overview/" => Ok(html.to_string()),
                _ => Err(ScrapeError::UpstreamStatus {
                    url: path.to_string(),
                    status: 503,
                }),
            }
        }

        fn absolute_url(&self, path: &str) -> String {
            format!("http://test{path}")
        }
    }

    const OVERVIEW: &str = r#"
        <a href="/haltestellen/overview/12/">Main Square</a>
        <a href="/haltestellen/overview/7/">River Bridge</a>
    "#;

    #[test]
    fn name_lookup() {
        let snapshot = StationSnapshot::new(list(&[(7, "River Bridge"), (12, "Main Square")]));
        assert_eq!(snapshot.name(sid(7)).unwrap(), "River Bridge");
        assert!(matches!(
            snapshot.name(sid(3)),
            Err(ScrapeError::UnknownStation(id)) if id == sid(3)
        ));
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert!(StationSnapshot::default().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_limited() {
        let snapshot = StationSnapshot::new(list(&[
            (1, "Neumarkt"),
            (2, "Heumarkt"),
            (3, "Dom/Hbf"),
            (4, "Chlodwigplatz"),
        ]));

        let hits = snapshot.search("MARKT", 10);
        let ids: Vec<u32> = hits.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);

        let hits = snapshot.search("markt", 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Neumarkt");

        assert!(snapshot.search("   ", 10).is_empty());
    }

    #[tokio::test]
    async fn load_fetches_overview() {
        let source = OverviewPage {
            html: Some(OVERVIEW),
            fetches: AtomicUsize::new(0),
        };

        let snapshot = StationSnapshot::load(&source).await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.name(sid(7)).unwrap(), "River Bridge");
        assert_eq!(snapshot.name(sid(12)).unwrap(), "Main Square");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn load_propagates_transport_error() {
        let source = OverviewPage {
            html: None,
            fetches: AtomicUsize::new(0),
        };

        let err = StationSnapshot::load(&source).await.unwrap_err();
        assert!(err.is_transport());
    }
}
