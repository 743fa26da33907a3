//! 购买效果落地
//!
//! 读取收货人档案、按规则表修改、带版本号整体写回。

use std::sync::Arc;

use game_shared::error::GameError;
use game_shared::observability::metrics;
use game_shared::profile::{Effect, EffectRules, ProfileRepositoryTrait};
use tracing::{debug, info, instrument};

use crate::error::{PayError, Result};

/// 档案效果服务
pub struct ProfileEffectService {
    repo: Arc<dyn ProfileRepositoryTrait>,
    rules: EffectRules,
}

impl ProfileEffectService {
    /// 规则集跟随仓储的档案结构版本
    pub fn new(repo: Arc<dyn ProfileRepositoryTrait>) -> Self {
        let rules = EffectRules::for_schema(repo.schema());
        Self { repo, rules }
    }

    pub fn rules(&self) -> &EffectRules {
        &self.rules
    }

    /// 将商品效果应用到用户档案
    ///
    /// 未匹配的商品代码不修改任何字段，但档案仍会原样写回一次。
    #[instrument(skip(self), fields(schema = %self.rules.schema()))]
    pub async fn apply(&self, user_id: &str, item: &str) -> Result<Option<Effect>> {
        let stored = self
            .repo
            .find(user_id)
            .await
            .map_err(PayError::Database)?
            .filter(|stored| !stored.profile.is_blank())
            .ok_or_else(|| PayError::UserNotFound {
                user_id: user_id.to_string(),
            })?;

        let mut profile = stored.profile;
        let effect = self
            .rules
            .apply(&mut profile, item)
            .map_err(PayError::ProfileUpdateFailed)?;

        self.repo
            .replace(&profile, stored.version)
            .await
            .map_err(|e| match e {
                GameError::ConcurrencyConflict { .. } => PayError::ProfileConflict {
                    user_id: user_id.to_string(),
                },
                other => PayError::ProfileUpdateFailed(other),
            })?;

        match effect {
            Some(effect) => {
                metrics::record_profile_effect(self.rules.schema().as_str(), effect.name());
                info!(effect = effect.name(), "商品效果已应用");
            }
            None => debug!("商品代码未匹配任何规则，档案保持不变"),
        }

        Ok(effect)
    }
}
