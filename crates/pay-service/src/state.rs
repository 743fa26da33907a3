//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use game_shared::config::{FormDecoding, PayConfig};
use game_shared::profile::PgProfileRepository;
use sqlx::PgPool;

use crate::repository::{
    MemoryRepositories, OrderRepositoryTrait, PgCatalogRepository, PgOrderRepository,
    PgSequenceGenerator,
};
use crate::service::{ProfileEffectService, PurchaseProcessor};

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<PurchaseProcessor>,
    /// 订单查询直接走仓储
    pub orders: Arc<dyn OrderRepositoryTrait>,
    pub form_decoding: FormDecoding,
}

impl AppState {
    pub fn new(
        processor: Arc<PurchaseProcessor>,
        orders: Arc<dyn OrderRepositoryTrait>,
        form_decoding: FormDecoding,
    ) -> Self {
        Self {
            processor,
            orders,
            form_decoding,
        }
    }

    /// 基于 PostgreSQL 连接池装配
    pub fn with_postgres(pool: PgPool, config: &PayConfig) -> Self {
        let orders: Arc<dyn OrderRepositoryTrait> = Arc::new(PgOrderRepository::new(pool.clone()));
        let profiles = ProfileEffectService::new(Arc::new(PgProfileRepository::new(
            pool.clone(),
            config.profile_schema,
        )));

        let processor = PurchaseProcessor::new(
            orders.clone(),
            Arc::new(PgSequenceGenerator::new(pool.clone())),
            Arc::new(PgCatalogRepository::new(pool)),
            profiles,
            config.item_expiration_seconds,
        );

        Self::new(Arc::new(processor), orders, config.form_decoding)
    }

    /// 基于内存仓储装配，`repos` 的克隆与状态共享数据
    pub fn with_memory(repos: &MemoryRepositories, config: &PayConfig) -> Self {
        let orders: Arc<dyn OrderRepositoryTrait> = Arc::new(repos.orders.clone());
        let processor = PurchaseProcessor::new(
            orders.clone(),
            Arc::new(repos.sequence.clone()),
            Arc::new(repos.catalog.clone()),
            ProfileEffectService::new(Arc::new(repos.profiles.clone())),
            config.item_expiration_seconds,
        );

        Self::new(Arc::new(processor), orders, config.form_decoding)
    }
}
