//! 用户档案服务入口

use std::sync::Arc;

use game_shared::{
    config::{AppConfig, StorageBackend},
    database::Database,
    http::shutdown_signal,
    observability,
};
use profile_service::{
    AppState, migrate_legacy_profiles,
    repository::{
        LegacyProfileRepositoryTrait, MemoryLegacyProfileRepository, MemoryUserRepository,
        PgLegacyProfileRepository, PgUserRepository, UserRepositoryTrait,
    },
    routes,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("profile-service")?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        "Starting profile-service on {}",
        config.server_addr()
    );

    // 数据库不可达、建表/索引失败或旧版档案读取失败时直接退出
    let (users, legacy, db): (
        Arc<dyn UserRepositoryTrait>,
        Arc<dyn LegacyProfileRepositoryTrait>,
        Option<Database>,
    ) = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            db.run_migrations().await?;
            (
                Arc::new(PgUserRepository::new(db.pool().clone())),
                Arc::new(PgLegacyProfileRepository::new(db.pool().clone())),
                Some(db),
            )
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will not survive a restart");
            (
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemoryLegacyProfileRepository::new()),
                None,
            )
        }
    };

    if config.profile.migrate_legacy_on_startup {
        migrate_legacy_profiles(legacy.as_ref(), users.as_ref()).await?;
    } else {
        info!("Legacy profile migration disabled");
    }

    let app = routes::app(AppState::new(users));

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
