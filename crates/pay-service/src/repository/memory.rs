//! 内存仓储实现
//!
//! 用于本地开发（`storage.backend = "memory"`）与测试。数据只存在于当前进程，
//! 计数器的原子性依赖 DashMap 的分片锁。

use async_trait::async_trait;
use game_shared::error::{GameError, Result};
use game_shared::memory_store::MemoryStore;
use game_shared::profile::{MemoryProfileRepository, SchemaVersion};

use super::traits::{CatalogRepositoryTrait, OrderRepositoryTrait, SequenceGeneratorTrait};
use crate::models::{CatalogItem, Order, OrderChannel};

/// 内存订单仓储，正式与测试订单分开存放
#[derive(Clone, Default)]
pub struct MemoryOrderRepository {
    live: MemoryStore<Order>,
    test: MemoryStore<Order>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, channel: OrderChannel) -> &MemoryStore<Order> {
        match channel {
            OrderChannel::Live => &self.live,
            OrderChannel::Test => &self.test,
        }
    }

    /// 指定通道的订单总数
    pub fn count(&self, channel: OrderChannel) -> usize {
        self.store(channel).count()
    }

    pub fn get(&self, channel: OrderChannel, app_order_id: i64) -> Option<Order> {
        self.store(channel).get(&app_order_id.to_string())
    }
}

#[async_trait]
impl OrderRepositoryTrait for MemoryOrderRepository {
    async fn insert(&self, channel: OrderChannel, order: &Order) -> Result<()> {
        let key = order.app_order_id.to_string();
        if self.store(channel).insert_unique(&key, order.clone()) {
            Ok(())
        } else {
            Err(GameError::AlreadyExists {
                entity: "Order".to_string(),
                field: "app_order_id".to_string(),
                value: key,
            })
        }
    }

    async fn delete(&self, channel: OrderChannel, app_order_id: i64) -> Result<bool> {
        Ok(self
            .store(channel)
            .remove(&app_order_id.to_string())
            .is_some())
    }

    async fn list(
        &self,
        channel: OrderChannel,
        receiver_id: i64,
        app_id: i64,
    ) -> Result<Vec<Order>> {
        Ok(self
            .store(channel)
            .list_by(|o| o.receiver_id == receiver_id && o.app_id == app_id))
    }
}

/// 内存计数器
#[derive(Clone, Default)]
pub struct MemorySequenceGenerator {
    counters: MemoryStore<i64>,
}

impl MemorySequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceGeneratorTrait for MemorySequenceGenerator {
    async fn next(&self, counter: &str) -> Result<i64> {
        Ok(self.counters.upsert_with(
            counter,
            || 0,
            |seq| {
                *seq += 1;
                *seq
            },
        ))
    }
}

/// 内存商品橱窗
#[derive(Clone, Default)]
pub struct MemoryCatalogRepository {
    items: MemoryStore<CatalogItem>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(app_id: i64, item: &str) -> String {
        format!("{app_id}:{item}")
    }

    /// 上架商品，(app_id, item) 相同时覆盖
    pub fn insert(&self, item: CatalogItem) {
        self.items.upsert(&Self::key(item.app_id, &item.item), item);
    }
}

#[async_trait]
impl CatalogRepositoryTrait for MemoryCatalogRepository {
    async fn find(&self, app_id: i64, item: &str) -> Result<Option<CatalogItem>> {
        Ok(self.items.get(&Self::key(app_id, item)))
    }
}

/// 一组共享数据的内存仓储
#[derive(Clone)]
pub struct MemoryRepositories {
    pub orders: MemoryOrderRepository,
    pub sequence: MemorySequenceGenerator,
    pub catalog: MemoryCatalogRepository,
    pub profiles: MemoryProfileRepository,
}

impl MemoryRepositories {
    pub fn new(profile_schema: SchemaVersion) -> Self {
        Self {
            orders: MemoryOrderRepository::new(),
            sequence: MemorySequenceGenerator::new(),
            catalog: MemoryCatalogRepository::new(),
            profiles: MemoryProfileRepository::new(profile_schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(app_order_id: i64, receiver_id: i64, app_id: i64) -> Order {
        Order {
            app_order_id,
            app_id,
            user_id: 1,
            receiver_id,
            order_id: 900 + app_order_id,
            date: 1_700_000_000,
            status: "chargeable".to_string(),
            item: "buy_all".to_string(),
            item_id: "1".to_string(),
            item_title: "Full game".to_string(),
            item_photo_url: String::new(),
            item_price: "30".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_order_is_rejected() {
        let repo = MemoryOrderRepository::new();
        repo.insert(OrderChannel::Live, &order(1, 10, 7)).await.unwrap();

        let err = repo
            .insert(OrderChannel::Live, &order(1, 11, 7))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::AlreadyExists { .. }));
        assert_eq!(repo.count(OrderChannel::Live), 1);
        assert_eq!(repo.get(OrderChannel::Live, 1).unwrap().receiver_id, 10);
    }

    #[tokio::test]
    async fn test_channels_do_not_share_orders() {
        let repo = MemoryOrderRepository::new();
        repo.insert(OrderChannel::Live, &order(1, 10, 7)).await.unwrap();
        repo.insert(OrderChannel::Test, &order(1, 10, 7)).await.unwrap();

        assert!(repo.delete(OrderChannel::Test, 1).await.unwrap());
        assert!(!repo.delete(OrderChannel::Test, 1).await.unwrap());
        assert_eq!(repo.count(OrderChannel::Live), 1);
    }

    #[tokio::test]
    async fn test_list_filters_and_keeps_insertion_order() {
        let repo = MemoryOrderRepository::new();
        repo.insert(OrderChannel::Live, &order(3, 10, 7)).await.unwrap();
        repo.insert(OrderChannel::Live, &order(1, 10, 7)).await.unwrap();
        repo.insert(OrderChannel::Live, &order(2, 11, 7)).await.unwrap();
        repo.insert(OrderChannel::Live, &order(4, 10, 8)).await.unwrap();

        let ids: Vec<i64> = repo
            .list(OrderChannel::Live, 10, 7)
            .await
            .unwrap()
            .iter()
            .map(|o| o.app_order_id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_sequence_counters_are_independent() {
        let seq = MemorySequenceGenerator::new();
        assert_eq!(seq.next("pay").await.unwrap(), 1);
        assert_eq!(seq.next("pay").await.unwrap(), 2);
        assert_eq!(seq.next("pay_test").await.unwrap(), 1);
        assert_eq!(seq.next("pay").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_catalog_lookup_by_app_and_item() {
        let catalog = MemoryCatalogRepository::new();
        catalog.insert(CatalogItem {
            app_id: 7,
            item: "buy_all".to_string(),
            title: "Full game".to_string(),
            photo_url: String::new(),
            price: 30,
            item_id: "1".to_string(),
        });

        assert!(catalog.find(7, "buy_all").await.unwrap().is_some());
        assert!(catalog.find(8, "buy_all").await.unwrap().is_none());
        assert!(catalog.find(7, "buy_reset").await.unwrap().is_none());
    }
}
