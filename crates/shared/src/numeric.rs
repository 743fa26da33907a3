//! 文本数值字段
//!
//! 档案中的计数类字段以文本形式存储和传输。`NumericText` 保留原始文本，
//! 读取时统一按"无法解析视为 0"处理，只有被写入时才重新序列化，
//! 因此未被修改的字段在读写往返后逐字节不变。

use serde::{Deserialize, Serialize};

/// 以文本形式存储的整数字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct NumericText(String);

impl NumericText {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_value(value: i64) -> Self {
        Self(value.to_string())
    }

    /// 原始文本
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 严格解析，失败返回 None
    pub fn parse(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// 宽松读取：无法解析（含空串）视为 0
    pub fn value(&self) -> i64 {
        self.parse().unwrap_or(0)
    }

    pub fn set(&mut self, value: i64) {
        self.0 = value.to_string();
    }

    /// 在宽松读取的当前值上累加并写回
    pub fn add(&mut self, delta: i64) {
        self.set(self.value().saturating_add(delta));
    }
}

impl From<&str> for NumericText {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for NumericText {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for NumericText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
