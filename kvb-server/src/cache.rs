//! Caching layer in front of the KVB scraper.
//!
//! The KVB site is slow and rate-limits clients, while the station list,
//! station details and line pages change rarely. Those are cached for a few
//! minutes; departures are live and always fetched.
//!
//! Entries carry their own TTL. Errors are never cached, and there is no
//! single-flight: concurrent misses for the same key may both fetch, and the
//! last write wins.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache as MokaCache;

use crate::domain::{
    Departure, LineDetails, LineId, ScheduleLinks, StationDetails, StationId, StationList,
};
use crate::scrape::{
    ImmediateDepartures, KvbClient, PageSource, ScrapeError, extract_departures,
    extract_line_details, extract_station_details, extract_station_list, urls,
};
use crate::stations::StationSnapshot;

/// Default TTL for cached pages: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of entries per cached endpoint. Beyond this moka
    /// evicts the least useful entries before they expire.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_capacity: 10_000,
        }
    }
}

/// Cache key: one variant per cacheable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    StationList,
    StationDetails(StationId),
    LineDetails(StationId, LineId),
}

impl CacheKey {
    /// API path of the request this key stands for.
    pub fn path(&self) -> String {
        match self {
            CacheKey::StationList => "/stations/".to_string(),
            CacheKey::StationDetails(station) => format!("/stations/{station}/"),
            CacheKey::LineDetails(station, line) => {
                format!("/stations/{station}/lines/{line}/")
            }
        }
    }
}

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Expires every entry after the TTL it was stored with.
struct PerEntryTtl;

impl<K, V> Expiry<K, Entry<V>> for PerEntryTtl {
    fn expire_after_create(&self, _key: &K, entry: &Entry<V>, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Key → value store with per-entry expiration.
pub struct ResultCache<K, V> {
    inner: MokaCache<K, Entry<V>>,
}

impl<K, V> ResultCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }

    /// Get a live entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await.map(|entry| entry.value)
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    pub async fn set(&self, key: K, value: V, ttl: Duration) {
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    /// Cache-aside lookup.
    ///
    /// Returns the cached value for `key`, or runs `compute`, stores a
    /// successful result for `ttl` and returns it. Errors pass through
    /// uncached.
    pub async fn get_or_try_insert_with<E, F, Fut>(
        &self,
        key: K,
        ttl: Duration,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(?key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(?key, "cache miss");
        let value = compute().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

/// KVB scraper with caching.
///
/// Wraps a [`PageSource`] and the startup [`StationSnapshot`], running each
/// request through fetch → extract, with the cacheable endpoints behind a
/// [`ResultCache`].
pub struct CachedKvbClient<S = KvbClient> {
    source: S,
    snapshot: Arc<StationSnapshot>,
    station_lists: ResultCache<CacheKey, Arc<StationList>>,
    station_details: ResultCache<CacheKey, Arc<StationDetails>>,
    line_details: ResultCache<CacheKey, Arc<LineDetails>>,
    ttl: Duration,
    immediate: ImmediateDepartures,
}

impl<S: PageSource> CachedKvbClient<S> {
    /// Create a new cached client.
    pub fn new(source: S, snapshot: StationSnapshot, config: &CacheConfig) -> Self {
        Self {
            source,
            snapshot: Arc::new(snapshot),
            station_lists: ResultCache::new(config.max_capacity),
            station_details: ResultCache::new(config.max_capacity),
            line_details: ResultCache::new(config.max_capacity),
            ttl: config.ttl,
            immediate: ImmediateDepartures::default(),
        }
    }

    /// Set the policy for departures that are leaving right now.
    pub fn with_immediate_departures(mut self, policy: ImmediateDepartures) -> Self {
        self.immediate = policy;
        self
    }

    /// All stations, freshly scraped from the overview page (cached).
    pub async fn station_list(&self) -> Result<Arc<StationList>, ScrapeError> {
        let key = CacheKey::StationList;
        self.log_request(&key);

        let source = &self.source;
        self.station_lists
            .get_or_try_insert_with(key, self.ttl, move || async move {
                let html = source.fetch(&urls::station_list()).await?;
                Ok(Arc::new(extract_station_list(&html)))
            })
            .await
    }

    /// Name and lines of a station (cached).
    ///
    /// Stations missing from the snapshot are rejected before any fetch.
    pub async fn station_details(
        &self,
        station: StationId,
    ) -> Result<Arc<StationDetails>, ScrapeError> {
        self.snapshot.name(station)?;
        let key = CacheKey::StationDetails(station);
        self.log_request(&key);

        let (source, snapshot) = (&self.source, &*self.snapshot);
        self.station_details
            .get_or_try_insert_with(key, self.ttl, move || async move {
                let html = source.fetch(&urls::station_details(station)).await?;
                extract_station_details(station, &html, snapshot).map(Arc::new)
            })
            .await
    }

    /// Stations served by a line in each direction (cached).
    pub async fn line_details(
        &self,
        station: StationId,
        line: LineId,
    ) -> Result<Arc<LineDetails>, ScrapeError> {
        let key = CacheKey::LineDetails(station, line);
        self.log_request(&key);

        let source = &self.source;
        self.line_details
            .get_or_try_insert_with(key, self.ttl, move || async move {
                let html = source.fetch(&urls::line_details(station, line)).await?;
                Ok(Arc::new(extract_line_details(station, line, &html)))
            })
            .await
    }

    /// Live departures; never cached.
    pub async fn departures(&self, station: StationId) -> Result<Vec<Departure>, ScrapeError> {
        let html = self.source.fetch(&urls::departures(station)).await?;
        extract_departures(station, &html, self.immediate)
    }

    /// Links to the printed timetables of a known station.
    pub fn schedule_links(&self, station: StationId) -> Result<ScheduleLinks, ScrapeError> {
        self.snapshot.name(station)?;
        Ok(ScheduleLinks {
            station_id: station,
            timetable_url: self.source.absolute_url(&urls::timetable(station)),
            pocket_timetable_url: self.source.absolute_url(&urls::pocket_timetable(station)),
        })
    }

    pub fn snapshot(&self) -> &StationSnapshot {
        &self.snapshot
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.station_lists.entry_count()
            + self.station_details.entry_count()
            + self.line_details.entry_count()
    }

    fn log_request(&self, key: &CacheKey) {
        tracing::debug!(
            path = %key.path(),
            cached_entries = self.cache_entry_count(),
            "cacheable request"
        );
    }
}
