//! 档案仓储
//!
//! 购买链路只需要"按 id 读取"与"整体替换"两个操作。整体替换带版本号比较，
//! 读取与写回之间档案被其他请求修改时返回 `ConcurrencyConflict`，不会覆盖对方的写入。

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::error::{GameError, Result};
use crate::memory_store::MemoryStore;

use super::models::{Profile, ProfileV1, ProfileV2, SchemaVersion, StoredProfile};

const ENTITY: &str = "Profile";

/// 档案仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepositoryTrait: Send + Sync {
    /// 该仓储读写的档案结构版本
    fn schema(&self) -> SchemaVersion;

    /// 按 id 精确查找
    async fn find(&self, id: &str) -> Result<Option<StoredProfile>>;

    /// 整体替换档案
    ///
    /// 存储中的版本号不等于 `expected_version`（或记录已被删除）时返回 `ConcurrencyConflict`
    async fn replace(&self, profile: &Profile, expected_version: i64) -> Result<()>;
}

fn conflict(id: &str, expected_version: i64) -> GameError {
    GameError::ConcurrencyConflict {
        entity: ENTITY.to_string(),
        id: id.to_string(),
        expected_version,
    }
}

#[derive(sqlx::FromRow)]
struct V1Row {
    #[sqlx(flatten)]
    profile: ProfileV1,
    version: i64,
}

#[derive(sqlx::FromRow)]
struct V2Row {
    #[sqlx(flatten)]
    profile: ProfileV2,
    version: i64,
}

/// PostgreSQL 档案仓储
///
/// 表名由结构版本决定：v1 为 `arrows_users`，v2 为 `users_arrows`
pub struct PgProfileRepository {
    pool: PgPool,
    schema: SchemaVersion,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool, schema: SchemaVersion) -> Self {
        Self { pool, schema }
    }

    async fn replace_v1(&self, p: &ProfileV1, expected_version: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE arrows_users
            SET xp_amount = $2, xp_damount = $3, all_ok = $4, lvl_ok = $5,
                version = version + 1
            WHERE id = $1 AND version = $6
            "#,
        )
        .bind(&p.id)
        .bind(&p.xp_amount)
        .bind(&p.xp_damount)
        .bind(&p.all_ok)
        .bind(&p.lvl_ok)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn replace_v2(&self, p: &ProfileV2, expected_version: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users_arrows
            SET lvl_ok = $2, all_ok = $3, hint_fstep = $4, hint_back = $5,
                live_count = $6, live_time = $7, price_time = $8, game_time = $9,
                game_points = $10, game_lvl_try = $11, sound = $12, music = $13,
                reserve_1 = $14, reserve_2 = $15, reserve_3 = $16, reserve_4 = $17,
                version = version + 1
            WHERE id = $1 AND version = $18
            "#,
        )
        .bind(&p.id)
        .bind(&p.lvl_ok)
        .bind(&p.all_ok)
        .bind(&p.hint_fstep)
        .bind(&p.hint_back)
        .bind(&p.live_count)
        .bind(&p.live_time)
        .bind(&p.price_time)
        .bind(&p.game_time)
        .bind(&p.game_points)
        .bind(&p.game_lvl_try)
        .bind(&p.sound)
        .bind(&p.music)
        .bind(&p.reserve_1)
        .bind(&p.reserve_2)
        .bind(&p.reserve_3)
        .bind(&p.reserve_4)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ProfileRepositoryTrait for PgProfileRepository {
    fn schema(&self) -> SchemaVersion {
        self.schema
    }

    async fn find(&self, id: &str) -> Result<Option<StoredProfile>> {
        let stored = match self.schema {
            SchemaVersion::V1 => sqlx::query_as::<_, V1Row>(
                r#"
                SELECT id, xp_amount, xp_damount, all_ok, lvl_ok, version
                FROM arrows_users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| StoredProfile {
                profile: row.profile.into(),
                version: row.version,
            }),
            SchemaVersion::V2 => sqlx::query_as::<_, V2Row>(
                r#"
                SELECT id, lvl_ok, all_ok, hint_fstep, hint_back, live_count, live_time,
                       price_time, game_time, game_points, game_lvl_try, sound, music,
                       reserve_1, reserve_2, reserve_3, reserve_4, version
                FROM users_arrows
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| StoredProfile {
                profile: row.profile.into(),
                version: row.version,
            }),
        };

        Ok(stored)
    }

    async fn replace(&self, profile: &Profile, expected_version: i64) -> Result<()> {
        if profile.schema() != self.schema {
            return Err(GameError::SchemaMismatch {
                expected: self.schema.to_string(),
                actual: profile.schema().to_string(),
            });
        }

        let affected = match profile {
            Profile::V1(p) => self.replace_v1(p, expected_version).await?,
            Profile::V2(p) => self.replace_v2(p, expected_version).await?,
        };

        if affected == 0 {
            debug!(user_id = %profile.id(), expected_version, "档案版本已变化");
            return Err(conflict(profile.id(), expected_version));
        }

        Ok(())
    }
}

/// 内存档案仓储
#[derive(Clone)]
pub struct MemoryProfileRepository {
    schema: SchemaVersion,
    store: MemoryStore<StoredProfile>,
}

impl MemoryProfileRepository {
    pub fn new(schema: SchemaVersion) -> Self {
        Self {
            schema,
            store: MemoryStore::new(),
        }
    }

    /// 写入一份版本号为 0 的档案，已存在时覆盖
    pub fn insert(&self, profile: impl Into<Profile>) {
        let profile = profile.into();
        let id = profile.id().to_string();
        self.store.upsert(&id, StoredProfile { profile, version: 0 });
    }

    /// 读取当前档案（不含版本号）
    pub fn get(&self, id: &str) -> Option<Profile> {
        self.store.get(id).map(|stored| stored.profile)
    }
}

#[async_trait]
impl ProfileRepositoryTrait for MemoryProfileRepository {
    fn schema(&self) -> SchemaVersion {
        self.schema
    }

    async fn find(&self, id: &str) -> Result<Option<StoredProfile>> {
        Ok(self.store.get(id))
    }

    async fn replace(&self, profile: &Profile, expected_version: i64) -> Result<()> {
        if profile.schema() != self.schema {
            return Err(GameError::SchemaMismatch {
                expected: self.schema.to_string(),
                actual: profile.schema().to_string(),
            });
        }

        let replaced = self.store.update_with(profile.id(), |stored| {
            if stored.version != expected_version {
                return false;
            }
            stored.profile = profile.clone();
            stored.version += 1;
            true
        });

        match replaced {
            Some(true) => Ok(()),
            _ => Err(conflict(profile.id(), expected_version)),
        }
    }
}
