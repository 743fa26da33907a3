//! 旧版档案仓储（只读）

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::LegacyProfileRepositoryTrait;
use game_shared::error::Result;
use game_shared::profile::ProfileV1;

pub struct PgLegacyProfileRepository {
    pool: PgPool,
}

impl PgLegacyProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LegacyProfileRepositoryTrait for PgLegacyProfileRepository {
    async fn list_all(&self) -> Result<Vec<ProfileV1>> {
        let users = sqlx::query_as::<_, ProfileV1>(
            "SELECT id, xp_amount, xp_damount, all_ok, lvl_ok FROM arrows_users",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
