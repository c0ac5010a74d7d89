use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;

use shop_accounts::{
    auth::bootstrap::{build_oauth_providers, seed_admin},
    config::AppConfig,
    db::{connection, dao::DaoContext},
    logging::init_tracing,
    routes::router,
    services::{maintenance::spawn_purge_job, notifier::LogResetNotifier},
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging);

    let db_cfg = cfg
        .database
        .as_ref()
        .context("database config is required (APP_DATABASE__URL)")?;
    let db = connection::connect(db_cfg).await?;
    let daos = DaoContext::new(&db);

    seed_admin(&cfg.auth, &daos).await?;
    let oauth = build_oauth_providers(&cfg.oauth)?;
    spawn_purge_job(daos, Duration::from_secs(cfg.auth.purge_interval_secs));

    let state = AppState::new(cfg, db, oauth, Arc::new(LogResetNotifier));

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
