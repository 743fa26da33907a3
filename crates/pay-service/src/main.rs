//! 支付服务入口

use game_shared::{
    config::{AppConfig, StorageBackend},
    database::Database,
    http::shutdown_signal,
    observability,
};
use pay_service::{AppState, repository::MemoryRepositories, routes};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("pay-service")?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        "Starting pay-service on {}",
        config.server_addr()
    );

    // 数据库不可达或迁移失败时直接退出
    let (state, db) = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            db.run_migrations().await?;
            (AppState::with_postgres(db.pool().clone(), &config.pay), Some(db))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will not survive a restart");
            let repos = MemoryRepositories::new(config.pay.profile_schema);
            (AppState::with_memory(&repos, &config.pay), None)
        }
    };

    info!(
        form_decoding = ?config.pay.form_decoding,
        profile_schema = %config.pay.profile_schema,
        "Pay pipeline configured"
    );

    let app = routes::app(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }

    info!("Server shutdown complete");

    Ok(())
}
