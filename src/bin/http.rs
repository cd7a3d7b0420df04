//! Availability HTTP API.
//!
//! Environment:
//! - `AVAILABILITY_TOOL_HTTP_ADDR`: bind address (default `0.0.0.0:3000`)
//! - `AVAILABILITY_TOOL_CONFIG`: optional JSON config path
//! - `AVAILABILITY_TOOL_DB`: optional SQLite path used by `POST /save` and loaded at startup
//! - `RUST_LOG`: log filter (default `info`)

#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use availability_tool::{AvailabilityConfig, WeeklyAvailabilityScheduler, http_api};
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("AVAILABILITY_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("AVAILABILITY_TOOL_CONFIG") {
        Ok(path) => {
            info!(%path, "loading config");
            AvailabilityConfig::from_json_file(path)?
        }
        Err(_) => AvailabilityConfig::default(),
    };

    let mut scheduler = WeeklyAvailabilityScheduler::with_config(&config);
    let mut store: Option<Arc<dyn availability_tool::AvailabilityStore + Send + Sync>> = None;

    #[cfg(feature = "sqlite")]
    if let Ok(db_path) = std::env::var("AVAILABILITY_TOOL_DB") {
        use availability_tool::{AvailabilityStore, SqliteAvailabilityStore};

        let sqlite = SqliteAvailabilityStore::new(&db_path)?;
        if let Some(week) = sqlite.load_schedule()? {
            info!(%db_path, slots = week.total_slots(), "resuming stored schedule");
            scheduler = WeeklyAvailabilityScheduler::from_snapshot(week);
        }
        store = Some(Arc::new(sqlite));
    }

    let mut state = http_api::AppState::new(scheduler, config);
    if let Some(store) = store {
        state = state.with_store(store);
    }

    info!("availability-tool HTTP API listening on http://{addr}");
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
