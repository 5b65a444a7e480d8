use kvb_server::cache::CachedKvbClient;
use kvb_server::config::ServerConfig;
use kvb_server::scrape::KvbClient;
use kvb_server::stations::StationSnapshot;
use kvb_server::web::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().expect("Failed to read configuration");
    tracing::info!(
        cache_ttl_secs = config.cache.ttl.as_secs(),
        immediate = ?config.immediate_departures,
        "Loaded configuration"
    );

    let kvb_client = KvbClient::new(config.kvb.clone()).expect("Failed to create KVB client");

    // Station snapshot (fail fast if unavailable)
    tracing::info!(base_url = kvb_client.base_url(), "Fetching station list");
    let snapshot = StationSnapshot::load(&kvb_client)
        .await
        .expect("Failed to load station snapshot");
    if snapshot.is_empty() {
        tracing::warn!("Station overview yielded no stations; every station lookup will 404");
    } else {
        tracing::info!(stations = snapshot.len(), "Loaded station snapshot");
    }

    let cached_kvb = CachedKvbClient::new(kvb_client, snapshot, &config.cache)
        .with_immediate_departures(config.immediate_departures);
    let app = create_router(AppState::new(cached_kvb, config.debug));

    let addr = config.bind_addr;
    tracing::info!("KVB API listening on http://{addr}");
    tracing::info!("  GET /                                       - Endpoint index");
    tracing::info!("  GET /health                                 - Health check");
    tracing::info!("  GET /stations/                              - All stations");
    tracing::info!("  GET /stations/{{id}}/                         - Station details");
    tracing::info!("  GET /stations/{{id}}/lines/{{line}}/            - Line details");
    tracing::info!("  GET /stations/{{id}}/departures/              - Live departures");
    tracing::info!("  GET /stations/{{id}}/schedules/               - Timetable links");
    tracing::info!("  GET /api/stations/search?q=                 - Station search");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
