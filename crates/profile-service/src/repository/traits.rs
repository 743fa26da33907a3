//! 仓储 Trait 定义

use async_trait::async_trait;
use game_shared::error::Result;
use game_shared::profile::{ProfileV1, ProfileV2};

/// 当前版档案仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<ProfileV2>>;

    /// id 已存在时返回 `AlreadyExists`
    async fn create(&self, profile: &ProfileV2) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<ProfileV2>>;

    /// 整体替换（包括 id 本身）并递增版本号，记录不存在时返回 false
    async fn update(&self, id: &str, profile: &ProfileV2) -> Result<bool>;

    /// 返回是否删除了记录
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// 旧版档案仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LegacyProfileRepositoryTrait: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ProfileV1>>;
}
