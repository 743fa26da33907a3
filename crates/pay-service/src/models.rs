//! 支付领域模型

use serde::{Deserialize, Serialize};

/// 订单通道
///
/// 正式与测试通道使用各自独立的计数器与订单表。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderChannel {
    Live,
    Test,
}

impl OrderChannel {
    /// 订单号计数器名称
    pub fn counter_name(&self) -> &'static str {
        match self {
            Self::Live => "pay",
            Self::Test => "pay_test",
        }
    }

    /// 订单表名
    pub fn table(&self) -> &'static str {
        match self {
            Self::Live => "pay_orders",
            Self::Test => "pay_orders_test",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Test => "test",
        }
    }
}

/// 购买订单
///
/// `app_order_id` 由计数器生成，在所属订单表内唯一；写入后不可修改，只会在补偿时删除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub app_order_id: i64,
    pub app_id: i64,
    pub user_id: i64,
    /// 收货人，赠送时与 user_id 不同
    pub receiver_id: i64,
    /// 平台侧订单号
    pub order_id: i64,
    /// UNIX 时间戳（秒）
    pub date: i64,
    pub status: String,
    pub item: String,
    pub item_id: String,
    pub item_title: String,
    pub item_photo_url: String,
    /// 原样保存的价格文本
    pub item_price: String,
}

/// 商品橱窗条目，按 (app_id, item) 唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogItem {
    pub app_id: i64,
    pub item: String,
    pub title: String,
    pub photo_url: String,
    pub price: i64,
    pub item_id: String,
}

/// 商品查询响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub title: String,
    pub photo_url: String,
    pub price: i64,
    pub item_id: String,
    /// 客户端缓存该商品信息的时长（秒）
    pub expiration: i64,
}

impl ItemResponse {
    pub fn from_catalog(item: CatalogItem, expiration: i64) -> Self {
        Self {
            title: item.title,
            photo_url: item.photo_url,
            price: item.price,
            item_id: item.item_id,
            expiration,
        }
    }
}

/// 下单成功回执
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub app_order_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_isolated() {
        assert_ne!(
            OrderChannel::Live.counter_name(),
            OrderChannel::Test.counter_name()
        );
        assert_eq!(OrderChannel::Live.table(), "pay_orders");
        assert_eq!(OrderChannel::Test.table(), "pay_orders_test");
    }

    #[test]
    fn test_item_response_adds_expiration() {
        let item = CatalogItem {
            app_id: 7,
            item: "buy_all".to_string(),
            title: "Full game".to_string(),
            photo_url: "https://cdn.example.com/all.png".to_string(),
            price: 30,
            item_id: "1".to_string(),
        };

        let value = serde_json::to_value(ItemResponse::from_catalog(item, 600)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Full game",
                "photo_url": "https://cdn.example.com/all.png",
                "price": 30,
                "item_id": "1",
                "expiration": 600
            })
        );
    }
}
