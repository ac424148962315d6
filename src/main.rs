// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tracing_subscriber::EnvFilter;

use gridshare_server::{
    api::router,
    config::Config,
    state::AppState,
    storage::{DataStore, StoragePaths},
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridshare_server=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let mut storage = DataStore::new(StoragePaths::new(&config.data_dir));
    if let Err(e) = storage.initialize() {
        tracing::error!(error = %e, "failed to initialize data directory");
        std::process::exit(1);
    }

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse bind address");
            std::process::exit(1);
        }
    };

    let state = AppState::new(storage, config);

    // Background sweep so expired links do not accumulate in memory
    let links = Arc::clone(&state.links);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let purged = links.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "purged expired links");
            }
        }
    });

    let app = router(state);

    tracing::info!("GridShare server listening on http://{addr} (docs at /docs)");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "failed to bind {addr}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}
