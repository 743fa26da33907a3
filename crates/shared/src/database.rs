//! 数据库连接管理模块
//!
//! 提供 PostgreSQL 连接池管理、连接配置和启动迁移。

use crate::config::DatabaseConfig;
use crate::error::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// 数据库连接池包装
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 创建数据库连接池
    #[instrument(skip(config))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await?;

        info!("Database connection pool created");

        Ok(Self { pool })
    }

    /// 获取连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// 运行迁移
    ///
    /// 建表与唯一索引都在 migrations 目录中，两个服务启动时各自执行，
    /// 已执行过的迁移会被跳过。
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

impl std::ops::Deref for Database {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}
