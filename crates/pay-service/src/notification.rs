//! 购买通知解码与校验
//!
//! 通知体是 `&` 分隔的 `key=value` 文本。默认按原始文本直接切分（不做 URL 解码），
//! 配置 `pay.form_decoding = "urlencoded"` 时改用标准表单解码。

use std::collections::HashMap;

use game_shared::config::FormDecoding;
use tracing::warn;

use crate::error::{PayError, Result};
use crate::models::{Order, OrderChannel};

/// 唯一合法的订单状态
pub const STATUS_CHARGEABLE: &str = "chargeable";

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    GetItem,
    GetItemTest,
    OrderStatusChange,
    OrderStatusChangeTest,
}

impl NotificationType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "get_item" => Some(Self::GetItem),
            "get_item_test" => Some(Self::GetItemTest),
            "order_status_change" => Some(Self::OrderStatusChange),
            "order_status_change_test" => Some(Self::OrderStatusChangeTest),
            _ => None,
        }
    }

    /// 下单类通知对应的订单通道
    pub fn order_channel(&self) -> Option<OrderChannel> {
        match self {
            Self::OrderStatusChange => Some(OrderChannel::Live),
            Self::OrderStatusChangeTest => Some(OrderChannel::Test),
            Self::GetItem | Self::GetItemTest => None,
        }
    }
}

/// 解码后的通知参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    params: HashMap<String, String>,
}

impl Notification {
    /// 按配置的方式解码请求体
    pub fn decode(body: &str, mode: FormDecoding) -> Self {
        match mode {
            FormDecoding::Legacy => Self::decode_legacy(body),
            FormDecoding::Urlencoded => Self::decode_urlencoded(body),
        }
    }

    /// 直接切分：值取第一个与第二个 `=` 之间的文本，没有 `=` 时为空串，重复键以后者为准
    fn decode_legacy(body: &str) -> Self {
        let params = body
            .split('&')
            .map(|pair| {
                let mut parts = pair.split('=');
                let key = parts.next().unwrap_or_default();
                let value = parts.next().unwrap_or_default();
                (key.to_string(), value.to_string())
            })
            .collect();
        Self { params }
    }

    fn decode_urlencoded(body: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(body) {
            Ok(pairs) => Self {
                params: pairs.into_iter().collect(),
            },
            Err(e) => {
                warn!(error = %e, "通知体无法按表单解码");
                Self::default()
            }
        }
    }

    pub fn from_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 缺失的参数视为空串
    pub fn get(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn notification_type(&self) -> &str {
        self.get("notification_type")
    }

    fn integer(&self, field: &'static str) -> Result<i64> {
        self.get(field)
            .parse()
            .map_err(|_| PayError::Conversion { field })
    }
}

/// 通过校验、尚未分配订单号的订单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub app_id: i64,
    pub user_id: i64,
    pub receiver_id: i64,
    /// 通知中的收货人原始文本，用于查找档案
    pub receiver_key: String,
    pub order_id: i64,
    pub date: i64,
    pub item: String,
    pub item_id: String,
    pub item_title: String,
    pub item_photo_url: String,
    pub item_price: String,
}

impl OrderDraft {
    /// 校验下单通知，首个失败即返回
    ///
    /// 状态最先检查，其余数值字段按 app_id、user_id、receiver_id、order_id、date 的顺序检查。
    pub fn from_notification(notification: &Notification) -> Result<Self> {
        if notification.get("status") != STATUS_CHARGEABLE {
            return Err(PayError::InvalidStatus);
        }

        let app_id = notification.integer("app_id")?;
        let user_id = notification.integer("user_id")?;
        let receiver_id = notification.integer("receiver_id")?;
        let order_id = notification.integer("order_id")?;
        let date = notification.integer("date")?;

        Ok(Self {
            app_id,
            user_id,
            receiver_id,
            receiver_key: notification.get("receiver_id").to_string(),
            order_id,
            date,
            item: notification.get("item").to_string(),
            item_id: notification.get("item_id").to_string(),
            item_title: notification.get("item_title").to_string(),
            item_photo_url: notification.get("item_photo_url").to_string(),
            item_price: notification.get("item_price").to_string(),
        })
    }

    pub fn into_order(self, app_order_id: i64) -> Order {
        Order {
            app_order_id,
            app_id: self.app_id,
            user_id: self.user_id,
            receiver_id: self.receiver_id,
            order_id: self.order_id,
            date: self.date,
            status: STATUS_CHARGEABLE.to_string(),
            item: self.item,
            item_id: self.item_id,
            item_title: self.item_title,
            item_photo_url: self.item_photo_url,
            item_price: self.item_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase_params() -> Vec<(&'static str, &'static str)> {
        vec![
            ("notification_type", "order_status_change"),
            ("status", "chargeable"),
            ("app_id", "7"),
            ("user_id", "100"),
            ("receiver_id", "200"),
            ("order_id", "5001"),
            ("date", "1700000000"),
            ("item", "buy_life_small"),
            ("item_id", "3"),
            ("item_title", "Lives"),
            ("item_photo_url", "https://cdn.example.com/lives.png"),
            ("item_price", "5"),
        ]
    }

    #[test]
    fn test_legacy_decoding_keeps_raw_text() {
        let n = Notification::decode(
            "notification_type=get_item&item=buy%5Fall&title=a+b&flag&x=1=2",
            FormDecoding::Legacy,
        );
        assert_eq!(n.notification_type(), "get_item");
        assert_eq!(n.get("item"), "buy%5Fall");
        assert_eq!(n.get("title"), "a+b");
        assert_eq!(n.get("flag"), "");
        assert_eq!(n.get("x"), "1");
        assert_eq!(n.get("missing"), "");
    }

    #[test]
    fn test_legacy_decoding_last_key_wins() {
        let n = Notification::decode("item=a&item=b", FormDecoding::Legacy);
        assert_eq!(n.get("item"), "b");
    }

    #[test]
    fn test_urlencoded_decoding() {
        let n = Notification::decode(
            "item=buy%5Fall&item_title=Full+game",
            FormDecoding::Urlencoded,
        );
        assert_eq!(n.get("item"), "buy_all");
        assert_eq!(n.get("item_title"), "Full game");
    }

    #[test]
    fn test_notification_type_parsing() {
        assert_eq!(
            NotificationType::parse("order_status_change_test")
                .and_then(|t| t.order_channel()),
            Some(OrderChannel::Test)
        );
        assert_eq!(NotificationType::parse("get_item").and_then(|t| t.order_channel()), None);
        assert_eq!(NotificationType::parse("refund"), None);
    }

    #[test]
    fn test_valid_draft() {
        let draft =
            OrderDraft::from_notification(&Notification::from_params(purchase_params())).unwrap();
        assert_eq!(draft.receiver_id, 200);
        assert_eq!(draft.receiver_key, "200");

        let order = draft.into_order(42);
        assert_eq!(order.app_order_id, 42);
        assert_eq!(order.status, "chargeable");
        assert_eq!(order.item_price, "5");
    }

    #[test]
    fn test_status_checked_before_numbers() {
        let mut params = purchase_params();
        params.retain(|(k, _)| *k != "status" && *k != "app_id");
        params.push(("status", "refunded"));
        params.push(("app_id", "abc"));

        let err = OrderDraft::from_notification(&Notification::from_params(params)).unwrap_err();
        assert!(matches!(err, PayError::InvalidStatus));
    }

    #[test]
    fn test_first_bad_number_is_reported() {
        let mut params = purchase_params();
        params.retain(|(k, _)| *k != "receiver_id" && *k != "date");
        params.push(("receiver_id", "x"));
        params.push(("date", "yesterday"));

        let err = OrderDraft::from_notification(&Notification::from_params(params)).unwrap_err();
        assert!(matches!(err, PayError::Conversion { field: "receiver_id" }));
    }

    #[test]
    fn test_missing_number_is_conversion_error() {
        let mut params = purchase_params();
        params.retain(|(k, _)| *k != "order_id");

        let err = OrderDraft::from_notification(&Notification::from_params(params)).unwrap_err();
        assert!(matches!(err, PayError::Conversion { field: "order_id" }));
    }
}
