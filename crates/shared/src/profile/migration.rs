//! 旧版档案迁移

use super::models::{ProfileV1, ProfileV2};

/// 将旧版档案转换为当前结构
///
/// 保留 id、已通过关卡与全部解锁标记；经验值在新体系中没有对应字段，直接丢弃。
/// 其余字段为空文本，读取时视为 0。
pub fn migrate_v1_to_v2(legacy: &ProfileV1) -> ProfileV2 {
    ProfileV2 {
        id: legacy.id.clone(),
        lvl_ok: legacy.lvl_ok.clone(),
        all_ok: legacy.all_ok.clone(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_keeps_progress_and_unlock() {
        let legacy = ProfileV1 {
            id: "555".to_string(),
            xp_amount: "120".into(),
            xp_damount: "40".into(),
            all_ok: "1".to_string(),
            lvl_ok: "23".into(),
        };

        let migrated = migrate_v1_to_v2(&legacy);
        assert_eq!(migrated.id, "555");
        assert_eq!(migrated.lvl_ok.as_str(), "23");
        assert_eq!(migrated.all_ok, "1");
        assert_eq!(migrated.live_count.as_str(), "");
        assert_eq!(migrated.hint_fstep.as_str(), "");
        assert_eq!(migrated.sound, "");
    }
}
