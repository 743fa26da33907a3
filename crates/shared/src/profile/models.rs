//! 档案模型
//!
//! 字段名与客户端约定的 JSON 字段保持一致。计数类字段使用 [`NumericText`]，
//! 开关与保留字段保持原始文本。

use serde::{Deserialize, Serialize};

use crate::numeric::NumericText;

/// 开关字段的"开启"取值
pub const FLAG_ON: &str = "1";

/// 档案结构版本
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V1,
    #[default]
    V2,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    /// 对应的档案集合（表名）
    pub fn table(&self) -> &'static str {
        match self {
            Self::V1 => "arrows_users",
            Self::V2 => "users_arrows",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 旧版档案（经验值体系）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct ProfileV1 {
    pub id: String,
    /// 当前经验值
    pub xp_amount: NumericText,
    /// 距下一级所需经验值
    pub xp_damount: NumericText,
    /// 已购买全部内容
    pub all_ok: String,
    /// 最后通过的关卡
    pub lvl_ok: NumericText,
}

/// 当前档案（生命/提示体系）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct ProfileV2 {
    pub id: String,
    /// 最后通过的关卡
    pub lvl_ok: NumericText,
    /// 已购买全部内容
    pub all_ok: String,
    /// 首步提示数量
    pub hint_fstep: NumericText,
    /// 撤销提示数量
    pub hint_back: NumericText,
    pub live_count: NumericText,
    /// 生命恢复时间戳（秒）
    pub live_time: NumericText,
    /// 价格时间戳（秒）
    pub price_time: NumericText,
    pub game_time: NumericText,
    /// 排行积分
    pub game_points: NumericText,
    /// 当前关卡尝试次数
    pub game_lvl_try: NumericText,
    pub sound: String,
    pub music: String,
    pub reserve_1: String,
    pub reserve_2: String,
    pub reserve_3: String,
    pub reserve_4: String,
}

/// 按结构版本区分的档案
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    V1(ProfileV1),
    V2(ProfileV2),
}

impl Profile {
    pub fn id(&self) -> &str {
        match self {
            Self::V1(p) => &p.id,
            Self::V2(p) => &p.id,
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        match self {
            Self::V1(_) => SchemaVersion::V1,
            Self::V2(_) => SchemaVersion::V2,
        }
    }

    /// 空 id 的档案视同不存在
    pub fn is_blank(&self) -> bool {
        self.id().is_empty()
    }
}

impl From<ProfileV1> for Profile {
    fn from(profile: ProfileV1) -> Self {
        Self::V1(profile)
    }
}

impl From<ProfileV2> for Profile {
    fn from(profile: ProfileV2) -> Self {
        Self::V2(profile)
    }
}

/// 存储中的档案及其版本号
///
/// 版本号只在存储层可见，不出现在 JSON 中；每次整体替换成功后加一。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProfile {
    pub profile: Profile,
    pub version: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_json_field_names() {
        let profile = ProfileV2 {
            id: "100".to_string(),
            live_count: NumericText::from("3"),
            reserve_4: "x".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&profile).unwrap();

        for field in [
            "id", "lvl_ok", "all_ok", "hint_fstep", "hint_back", "live_count", "live_time",
            "price_time", "game_time", "game_points", "game_lvl_try", "sound", "music",
            "reserve_1", "reserve_2", "reserve_3", "reserve_4",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(value["live_count"], "3");
        assert_eq!(value["reserve_4"], "x");
    }

    #[test]
    fn test_missing_json_fields_default_to_empty() {
        let profile: ProfileV2 = serde_json::from_str(r#"{"id": "7", "sound": "1"}"#).unwrap();
        assert_eq!(profile.id, "7");
        assert_eq!(profile.sound, "1");
        assert_eq!(profile.live_count.as_str(), "");
    }

    #[test]
    fn test_profile_variant_accessors() {
        let v1: Profile = ProfileV1 {
            id: "1".to_string(),
            ..Default::default()
        }
        .into();
        assert_eq!(v1.schema(), SchemaVersion::V1);
        assert_eq!(v1.id(), "1");
        assert!(!v1.is_blank());

        let blank: Profile = ProfileV2::default().into();
        assert!(blank.is_blank());
        assert_eq!(SchemaVersion::V2.table(), "users_arrows");
        assert_eq!(SchemaVersion::V1.table(), "arrows_users");
    }
}
