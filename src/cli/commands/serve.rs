use std::sync::Arc;

use anyhow::Context;

use super::connect;
use crate::config::config;
use crate::database::{AdminRepository, MemoryStore, PgStore, Store};
use crate::router::{app, RouterOptions};
use crate::state::AppState;

pub async fn handle(port: Option<u16>, memory: bool) -> anyhow::Result<()> {
    let config = config();

    let store: Arc<dyn Store> = if memory {
        let store = MemoryStore::new();
        store.save_admin("admin", "admin").await?;
        tracing::warn!("using in-memory store; data is lost on exit (login admin/admin)");
        Arc::new(store)
    } else {
        let db = connect().await?;
        db.migrate().await?;
        Arc::new(PgStore::new(&db))
    };

    tokio::fs::create_dir_all(&config.server.uploads_dir)
        .await
        .with_context(|| format!("failed to create {}", config.server.uploads_dir.display()))?;

    let state = AppState::new(store, config);
    let router = app(
        state,
        RouterOptions {
            max_body_bytes: config.server.max_request_size_bytes,
            enable_cors: config.security.enable_cors,
        },
    );

    let port = port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Portfolio server listening on http://{}", bind_addr);

    axum::serve(listener, router).await.context("server error")
}
