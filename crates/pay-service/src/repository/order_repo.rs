//! 订单仓储
//!
//! 正式与测试订单结构相同，表名由 [`OrderChannel`] 决定。

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::traits::OrderRepositoryTrait;
use crate::models::{Order, OrderChannel};
use game_shared::error::{GameError, Result};

/// PostgreSQL 订单仓储
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepositoryTrait for PgOrderRepository {
    async fn insert(&self, channel: OrderChannel, order: &Order) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO {} (app_order_id, app_id, user_id, receiver_id, order_id, date, status,
                            item, item_id, item_title, item_photo_url, item_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
            channel.table()
        );

        sqlx::query(&sql)
            .bind(order.app_order_id)
            .bind(order.app_id)
            .bind(order.user_id)
            .bind(order.receiver_id)
            .bind(order.order_id)
            .bind(order.date)
            .bind(&order.status)
            .bind(&order.item)
            .bind(&order.item_id)
            .bind(&order.item_title)
            .bind(&order.item_photo_url)
            .bind(&order.item_price)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                GameError::from_insert(e, "Order", "app_order_id", &order.app_order_id.to_string())
            })?;

        debug!(channel = channel.as_str(), app_order_id = order.app_order_id, "订单已写入");
        Ok(())
    }

    async fn delete(&self, channel: OrderChannel, app_order_id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE app_order_id = $1", channel.table());

        let result = sqlx::query(&sql)
            .bind(app_order_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        channel: OrderChannel,
        receiver_id: i64,
        app_id: i64,
    ) -> Result<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT app_order_id, app_id, user_id, receiver_id, order_id, date, status,
                   item, item_id, item_title, item_photo_url, item_price
            FROM {}
            WHERE receiver_id = $1 AND app_id = $2
            ORDER BY id
            "#,
            channel.table()
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(receiver_id)
            .bind(app_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }
}
