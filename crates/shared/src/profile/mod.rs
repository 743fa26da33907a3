//! 用户档案领域
//!
//! - `models`: 两代档案结构（v1 旧版 / v2 当前）及其统一包装
//! - `effects`: 商品代码到档案变更的效果规则表，按结构版本参数化
//! - `migration`: v1 → v2 的显式迁移函数
//! - `repository`: 档案存储接口（按 id 查找、带版本号的整体替换）

pub mod effects;
pub mod migration;
pub mod models;
pub mod repository;

pub use effects::{Effect, EffectRules, LIVES_PER_PURCHASE};
pub use migration::migrate_v1_to_v2;
pub use models::{FLAG_ON, Profile, ProfileV1, ProfileV2, SchemaVersion, StoredProfile};
pub use repository::{MemoryProfileRepository, PgProfileRepository, ProfileRepositoryTrait};
