//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use game_shared::error::Result;

use crate::models::{CatalogItem, Order, OrderChannel};

/// 订单仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepositoryTrait: Send + Sync {
    /// 写入订单，`app_order_id` 已存在时返回 `AlreadyExists` 且不产生任何写入
    async fn insert(&self, channel: OrderChannel, order: &Order) -> Result<()>;

    /// 按订单号删除，返回是否删除了记录
    async fn delete(&self, channel: OrderChannel, app_order_id: i64) -> Result<bool>;

    /// 按收货人与应用查询，按写入顺序返回
    async fn list(&self, channel: OrderChannel, receiver_id: i64, app_id: i64)
    -> Result<Vec<Order>>;
}

/// 订单号生成器接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceGeneratorTrait: Send + Sync {
    /// 原子地递增并返回指定计数器的新值，首次调用返回 1
    async fn next(&self, counter: &str) -> Result<i64>;
}

/// 商品橱窗仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepositoryTrait: Send + Sync {
    async fn find(&self, app_id: i64, item: &str) -> Result<Option<CatalogItem>>;
}
