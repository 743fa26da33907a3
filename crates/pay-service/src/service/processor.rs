//! 购买通知处理器
//!
//! 处理流程：校验 -> 分配订单号 -> 写订单（唯一索引去重）-> 应用档案效果。
//! 档案阶段任何失败都会删除刚写入的订单，保证失败的通知不会留下订单。

use std::sync::Arc;
use std::time::Instant;

use game_shared::error::GameError;
use game_shared::observability::metrics;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::error::{PayError, Result};
use crate::models::{ItemResponse, OrderChannel, OrderReceipt};
use crate::notification::{Notification, NotificationType, OrderDraft};
use crate::repository::{CatalogRepositoryTrait, OrderRepositoryTrait, SequenceGeneratorTrait};

use super::ProfileEffectService;

/// 通知处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PurchaseOutcome {
    Item(ItemResponse),
    Order(OrderReceipt),
}

/// 购买通知处理器
pub struct PurchaseProcessor {
    orders: Arc<dyn OrderRepositoryTrait>,
    sequence: Arc<dyn SequenceGeneratorTrait>,
    catalog: Arc<dyn CatalogRepositoryTrait>,
    profiles: ProfileEffectService,
    item_expiration: i64,
}

impl PurchaseProcessor {
    pub fn new(
        orders: Arc<dyn OrderRepositoryTrait>,
        sequence: Arc<dyn SequenceGeneratorTrait>,
        catalog: Arc<dyn CatalogRepositoryTrait>,
        profiles: ProfileEffectService,
        item_expiration: i64,
    ) -> Self {
        Self {
            orders,
            sequence,
            catalog,
            profiles,
            item_expiration,
        }
    }

    /// 按通知类型分发
    pub async fn handle(&self, notification: &Notification) -> Result<PurchaseOutcome> {
        let raw_type = notification.notification_type();
        let Some(kind) = NotificationType::parse(raw_type) else {
            return Err(PayError::UnknownNotificationType(raw_type.to_string()));
        };

        match kind.order_channel() {
            None => self.get_item(notification).await.map(PurchaseOutcome::Item),
            Some(channel) => {
                let start = Instant::now();
                let result = self.process(channel, notification).await;
                let code = result.as_ref().err().map_or(0, PayError::error_code);
                metrics::record_purchase(channel.as_str(), code, start.elapsed().as_secs_f64());
                result.map(PurchaseOutcome::Order)
            }
        }
    }

    /// 查询商品信息
    ///
    /// app_id 不是整数时按商品不存在处理
    #[instrument(
        skip(self, notification),
        fields(app_id = notification.get("app_id"), item = notification.get("item"))
    )]
    pub async fn get_item(&self, notification: &Notification) -> Result<ItemResponse> {
        let app_id: i64 = notification
            .get("app_id")
            .parse()
            .map_err(|_| PayError::ItemNotFound)?;

        let item = self
            .catalog
            .find(app_id, notification.get("item"))
            .await
            .map_err(PayError::Database)?
            .ok_or(PayError::ItemNotFound)?;

        Ok(ItemResponse::from_catalog(item, self.item_expiration))
    }

    /// 处理下单通知
    #[instrument(
        skip(self, notification),
        fields(channel = channel.as_str(), order_id = notification.get("order_id"))
    )]
    pub async fn process(
        &self,
        channel: OrderChannel,
        notification: &Notification,
    ) -> Result<OrderReceipt> {
        let draft = OrderDraft::from_notification(notification)?;
        let receiver_key = draft.receiver_key.clone();

        let app_order_id = self
            .sequence
            .next(channel.counter_name())
            .await
            .map_err(PayError::Database)?;

        let order = draft.into_order(app_order_id);
        self.orders
            .insert(channel, &order)
            .await
            .map_err(|e| match e {
                GameError::AlreadyExists { .. } => PayError::DuplicateOrder,
                other => PayError::Database(other),
            })?;

        if let Err(e) = self.profiles.apply(&receiver_key, &order.item).await {
            self.compensate(channel, app_order_id).await;
            return Err(e);
        }

        info!(
            app_order_id,
            receiver_id = %receiver_key,
            item = %order.item,
            "订单处理完成"
        );

        Ok(OrderReceipt {
            order_id: order.order_id,
            app_order_id,
        })
    }

    /// 删除档案阶段失败的订单
    ///
    /// 删除失败只记录日志，调用方收到的仍是档案阶段的错误。
    async fn compensate(&self, channel: OrderChannel, app_order_id: i64) {
        match self.orders.delete(channel, app_order_id).await {
            Ok(removed) => {
                warn!(app_order_id, removed, "档案更新失败，订单已回滚");
                metrics::record_order_compensation(channel.as_str(), true);
            }
            Err(e) => {
                error!(app_order_id, error = %e, "档案更新失败，订单回滚失败");
                metrics::record_order_compensation(channel.as_str(), false);
            }
        }
    }
}
