//! 内存仓储实现

use async_trait::async_trait;
use game_shared::error::{GameError, Result};
use game_shared::memory_store::MemoryStore;
use game_shared::profile::{ProfileV1, ProfileV2};

use super::traits::{LegacyProfileRepositoryTrait, UserRepositoryTrait};

fn already_exists(id: &str) -> GameError {
    GameError::AlreadyExists {
        entity: "Profile".to_string(),
        field: "id".to_string(),
        value: id.to_string(),
    }
}

/// 带版本号的档案记录
#[derive(Debug, Clone)]
struct UserRecord {
    profile: ProfileV2,
    version: i64,
}

/// 内存档案仓储
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    store: MemoryStore<UserRecord>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前版本号，记录不存在时为 None
    pub fn version(&self, id: &str) -> Option<i64> {
        self.store.get(id).map(|r| r.version)
    }
}

#[async_trait]
impl UserRepositoryTrait for MemoryUserRepository {
    async fn list(&self) -> Result<Vec<ProfileV2>> {
        Ok(self.store.list().into_iter().map(|r| r.profile).collect())
    }

    async fn create(&self, profile: &ProfileV2) -> Result<()> {
        let record = UserRecord {
            profile: profile.clone(),
            version: 0,
        };
        if self.store.insert_unique(&profile.id, record) {
            Ok(())
        } else {
            Err(already_exists(&profile.id))
        }
    }

    async fn get(&self, id: &str) -> Result<Option<ProfileV2>> {
        Ok(self.store.get(id).map(|r| r.profile))
    }

    async fn update(&self, id: &str, profile: &ProfileV2) -> Result<bool> {
        if profile.id == id {
            return Ok(self
                .store
                .update_with(id, |record| {
                    record.profile = profile.clone();
                    record.version += 1;
                })
                .is_some());
        }

        // 修改 id：目标 id 不能被占用
        let Some(current) = self.store.get(id) else {
            return Ok(false);
        };
        let moved = UserRecord {
            profile: profile.clone(),
            version: current.version + 1,
        };
        if !self.store.insert_unique(&profile.id, moved) {
            return Err(already_exists(&profile.id));
        }
        self.store.remove(id);
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.store.remove(id).is_some())
    }
}

/// 内存旧版档案仓储
#[derive(Clone, Default)]
pub struct MemoryLegacyProfileRepository {
    store: MemoryStore<ProfileV1>,
}

impl MemoryLegacyProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: ProfileV1) {
        let id = profile.id.clone();
        self.store.upsert(&id, profile);
    }
}

#[async_trait]
impl LegacyProfileRepositoryTrait for MemoryLegacyProfileRepository {
    async fn list_all(&self) -> Result<Vec<ProfileV1>> {
        Ok(self.store.list())
    }
}
