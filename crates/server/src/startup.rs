use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::{AppState, ConfigEcho};
use configs::AppConfig;
use service::{
    cache::RestaurantCache, directory::Directory, runtime,
    storage::json_table_store::JsonTableStore,
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // Configuration is read once here and handed down explicitly
    let cfg = AppConfig::load_and_validate()?;

    runtime::ensure_env(&cfg.table.data_dir).await?;

    let table_path = Path::new(&cfg.table.data_dir).join(format!("{}.json", cfg.table.name));
    let table = JsonTableStore::open(table_path).await?;

    let cache = cfg
        .cache
        .enabled
        .then(|| RestaurantCache::new(cfg.cache.capacity, Duration::from_secs(cfg.cache.ttl_secs)));

    let directory = Arc::new(Directory::new(table, cache));
    let state = AppState {
        directory,
        config: ConfigEcho {
            table_name: cfg.table.name.clone(),
            region: cfg.table.region.clone(),
            data_dir: cfg.table.data_dir.clone(),
            use_cache: cfg.cache.enabled,
        },
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, table = %cfg.table.name, use_cache = cfg.cache.enabled, "starting restaurant directory server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
