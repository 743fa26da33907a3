//! 商品效果规则
//!
//! 商品代码精确匹配规则表得到一个 [`Effect`]，再作用到内存中的档案上。
//! 未匹配的商品代码不产生效果（调用方仍会原样保存档案）。
//! 每次购买都是一次新的发放，同一效果重复应用会重复累加。

use crate::error::{GameError, Result};
use crate::numeric::NumericText;

use super::models::{FLAG_ON, Profile, ProfileV1, ProfileV2, SchemaVersion};

/// 每档生命包的基础生命数，同时是重置进度后的生命数
pub const LIVES_PER_PURCHASE: i64 = 5;

/// v1 经验值无法解析时重置到的基线
const XP_BASELINE_AMOUNT: i64 = 0;
const XP_BASELINE_TO_NEXT_LEVEL: i64 = 10;

/// 单个商品对档案的效果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// v1：当前经验值加上距下一级所需经验值
    LevelUp,
    /// 解锁全部内容
    UnlockAll,
    /// 增加生命（已乘以档位倍数）
    AddLives(i64),
    /// 增加首步提示
    AddFirstMoveHints(i64),
    /// 增加撤销提示
    AddUndoHints(i64),
    /// 重置进度与排行积分
    ResetProgress,
}

/// v2 规则表
const V2_RULES: &[(&str, Effect)] = &[
    ("buy_all", Effect::UnlockAll),
    ("buy_life_small", Effect::AddLives(LIVES_PER_PURCHASE)),
    ("buy_life_mid", Effect::AddLives(2 * LIVES_PER_PURCHASE)),
    ("buy_life_large", Effect::AddLives(5 * LIVES_PER_PURCHASE)),
    ("buy_fstep_small", Effect::AddFirstMoveHints(10)),
    ("buy_fstep_mid", Effect::AddFirstMoveHints(25)),
    ("buy_fstep_large", Effect::AddFirstMoveHints(50)),
    ("buy_back_small", Effect::AddUndoHints(10)),
    ("buy_back_mid", Effect::AddUndoHints(25)),
    ("buy_back_large", Effect::AddUndoHints(50)),
    ("buy_reset", Effect::ResetProgress),
];

impl Effect {
    /// 指标标签用的名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::LevelUp => "level_up",
            Self::UnlockAll => "unlock_all",
            Self::AddLives(_) => "add_lives",
            Self::AddFirstMoveHints(_) => "add_first_move_hints",
            Self::AddUndoHints(_) => "add_undo_hints",
            Self::ResetProgress => "reset_progress",
        }
    }

    fn apply_v1(self, profile: &mut ProfileV1) {
        match self {
            Self::LevelUp => match (profile.xp_amount.parse(), profile.xp_damount.parse()) {
                (Some(amount), Some(to_next)) => {
                    profile.xp_amount.set(amount.saturating_add(to_next));
                }
                _ => {
                    tracing::warn!(
                        user_id = %profile.id,
                        xp_amount = %profile.xp_amount,
                        xp_damount = %profile.xp_damount,
                        "经验值无法解析，重置为基线"
                    );
                    profile.xp_amount = NumericText::from_value(XP_BASELINE_AMOUNT);
                    profile.xp_damount = NumericText::from_value(XP_BASELINE_TO_NEXT_LEVEL);
                }
            },
            Self::UnlockAll => profile.all_ok = FLAG_ON.to_string(),
            // v1 规则表只产出以上两种效果
            _ => {}
        }
    }

    fn apply_v2(self, profile: &mut ProfileV2) {
        match self {
            Self::UnlockAll => profile.all_ok = FLAG_ON.to_string(),
            Self::AddLives(n) => profile.live_count.add(n),
            Self::AddFirstMoveHints(n) => profile.hint_fstep.add(n),
            Self::AddUndoHints(n) => profile.hint_back.add(n),
            Self::ResetProgress => {
                profile.game_points.set(0);
                profile.lvl_ok.set(0);
                profile.live_count.set(LIVES_PER_PURCHASE);
                profile.price_time.set(0);
                profile.game_lvl_try.set(0);
            }
            Self::LevelUp => {}
        }
    }
}

/// 按档案结构版本选择的效果规则集
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectRules {
    schema: SchemaVersion,
}

impl EffectRules {
    pub fn for_schema(schema: SchemaVersion) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// 查找商品代码对应的效果
    pub fn lookup(&self, item_code: &str) -> Option<Effect> {
        match self.schema {
            SchemaVersion::V1 => {
                if item_code == "buy_lvl" || item_code.contains("offer") {
                    Some(Effect::LevelUp)
                } else if item_code == "buy_all" {
                    Some(Effect::UnlockAll)
                } else {
                    None
                }
            }
            SchemaVersion::V2 => V2_RULES
                .iter()
                .find(|(code, _)| *code == item_code)
                .map(|(_, effect)| *effect),
        }
    }

    /// 将商品效果作用到档案上，返回实际应用的效果（未匹配时为 None）
    pub fn apply(&self, profile: &mut Profile, item_code: &str) -> Result<Option<Effect>> {
        if profile.schema() != self.schema {
            return Err(GameError::SchemaMismatch {
                expected: self.schema.to_string(),
                actual: profile.schema().to_string(),
            });
        }

        let Some(effect) = self.lookup(item_code) else {
            return Ok(None);
        };

        match profile {
            Profile::V1(p) => effect.apply_v1(p),
            Profile::V2(p) => effect.apply_v2(p),
        }

        Ok(Some(effect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v2_profile() -> Profile {
        Profile::V2(ProfileV2 {
            id: "42".to_string(),
            lvl_ok: "17".into(),
            hint_fstep: "4".into(),
            hint_back: "2".into(),
            live_count: "3".into(),
            live_time: "1700000000".into(),
            price_time: "1700000100".into(),
            game_time: "3600".into(),
            game_points: "980".into(),
            game_lvl_try: "6".into(),
            sound: "1".to_string(),
            music: "0".to_string(),
            ..Default::default()
        })
    }

    fn as_v2(profile: &Profile) -> &ProfileV2 {
        match profile {
            Profile::V2(p) => p,
            Profile::V1(_) => panic!("expected v2 profile"),
        }
    }

    #[test]
    fn test_life_purchase_accumulates() {
        let rules = EffectRules::for_schema(SchemaVersion::V2);
        let mut profile = v2_profile();

        rules.apply(&mut profile, "buy_life_small").unwrap();
        assert_eq!(as_v2(&profile).live_count.as_str(), "8");

        rules.apply(&mut profile, "buy_life_small").unwrap();
        assert_eq!(as_v2(&profile).live_count.as_str(), "13");
    }

    #[test]
    fn test_life_tiers() {
        let rules = EffectRules::for_schema(SchemaVersion::V2);
        assert_eq!(rules.lookup("buy_life_small"), Some(Effect::AddLives(5)));
        assert_eq!(rules.lookup("buy_life_mid"), Some(Effect::AddLives(10)));
        assert_eq!(rules.lookup("buy_life_large"), Some(Effect::AddLives(25)));
    }

    #[test]
    fn test_hint_tiers() {
        let rules = EffectRules::for_schema(SchemaVersion::V2);
        let mut profile = v2_profile();

        rules.apply(&mut profile, "buy_fstep_small").unwrap();
        rules.apply(&mut profile, "buy_fstep_mid").unwrap();
        rules.apply(&mut profile, "buy_fstep_large").unwrap();
        rules.apply(&mut profile, "buy_back_small").unwrap();
        rules.apply(&mut profile, "buy_back_large").unwrap();

        let p = as_v2(&profile);
        assert_eq!(p.hint_fstep.as_str(), "89");
        assert_eq!(p.hint_back.as_str(), "62");
    }

    #[test]
    fn test_unparsable_counter_reads_as_zero() {
        let rules = EffectRules::for_schema(SchemaVersion::V2);
        let mut profile = Profile::V2(ProfileV2 {
            id: "1".to_string(),
            hint_back: "lots".into(),
            ..Default::default()
        });

        rules.apply(&mut profile, "buy_back_mid").unwrap();
        assert_eq!(as_v2(&profile).hint_back.as_str(), "25");
    }

    #[test]
    fn test_reset_leaves_other_fields_untouched() {
        let rules = EffectRules::for_schema(SchemaVersion::V2);
        let mut profile = v2_profile();
        let before = as_v2(&profile).clone();

        let effect = rules.apply(&mut profile, "buy_reset").unwrap();
        assert_eq!(effect, Some(Effect::ResetProgress));

        let p = as_v2(&profile);
        assert_eq!(p.game_points.as_str(), "0");
        assert_eq!(p.lvl_ok.as_str(), "0");
        assert_eq!(p.live_count.as_str(), "5");
        assert_eq!(p.price_time.as_str(), "0");
        assert_eq!(p.game_lvl_try.as_str(), "0");

        assert_eq!(p.hint_fstep, before.hint_fstep);
        assert_eq!(p.hint_back, before.hint_back);
        assert_eq!(p.sound, before.sound);
        assert_eq!(p.music, before.music);
        assert_eq!(p.live_time, before.live_time);
        assert_eq!(p.game_time, before.game_time);
    }

    #[test]
    fn test_unknown_item_is_noop() {
        let rules = EffectRules::for_schema(SchemaVersion::V2);
        let mut profile = v2_profile();
        let before = profile.clone();

        assert_eq!(rules.apply(&mut profile, "golden_hat").unwrap(), None);
        assert_eq!(profile, before);

        // v2 没有 offer 规则
        assert_eq!(rules.apply(&mut profile, "buy_lvl_offer").unwrap(), None);
        assert_eq!(profile, before);
    }

    #[test]
    fn test_unlock_all_v2() {
        let rules = EffectRules::for_schema(SchemaVersion::V2);
        let mut profile = v2_profile();
        rules.apply(&mut profile, "buy_all").unwrap();
        assert_eq!(as_v2(&profile).all_ok, "1");
    }

    #[test]
    fn test_v1_level_up_and_offer() {
        let rules = EffectRules::for_schema(SchemaVersion::V1);
        let mut profile = Profile::V1(ProfileV1 {
            id: "9".to_string(),
            xp_amount: "30".into(),
            xp_damount: "15".into(),
            ..Default::default()
        });

        rules.apply(&mut profile, "buy_lvl").unwrap();
        rules.apply(&mut profile, "spring_offer_2").unwrap();

        let Profile::V1(p) = &profile else {
            panic!("expected v1 profile");
        };
        assert_eq!(p.xp_amount.as_str(), "60");
        assert_eq!(p.xp_damount.as_str(), "15");
    }

    #[test]
    fn test_v1_level_up_resets_unparsable_xp() {
        let rules = EffectRules::for_schema(SchemaVersion::V1);
        let mut profile = Profile::V1(ProfileV1 {
            id: "9".to_string(),
            xp_amount: "".into(),
            xp_damount: "15".into(),
            ..Default::default()
        });

        rules.apply(&mut profile, "buy_lvl").unwrap();

        let Profile::V1(p) = &profile else {
            panic!("expected v1 profile");
        };
        assert_eq!(p.xp_amount.as_str(), "0");
        assert_eq!(p.xp_damount.as_str(), "10");
    }

    #[test]
    fn test_v1_offer_takes_precedence_over_buy_all() {
        let rules = EffectRules::for_schema(SchemaVersion::V1);
        assert_eq!(rules.lookup("buy_all"), Some(Effect::UnlockAll));
        assert_eq!(rules.lookup("buy_all_offer"), Some(Effect::LevelUp));
        assert_eq!(rules.lookup("buy_life_small"), None);
    }

    #[test]
    fn test_schema_mismatch_is_rejected() {
        let rules = EffectRules::for_schema(SchemaVersion::V1);
        let mut profile = v2_profile();
        let err = rules.apply(&mut profile, "buy_all").unwrap_err();
        assert!(matches!(err, GameError::SchemaMismatch { .. }));
    }
}
