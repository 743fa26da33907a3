//! 当前版档案仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::UserRepositoryTrait;
use game_shared::error::{GameError, Result};
use game_shared::profile::ProfileV2;

const COLUMNS: &str = "id, lvl_ok, all_ok, hint_fstep, hint_back, live_count, live_time, \
    price_time, game_time, game_points, game_lvl_try, sound, music, \
    reserve_1, reserve_2, reserve_3, reserve_4";

/// PostgreSQL 档案仓储
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for PgUserRepository {
    async fn list(&self) -> Result<Vec<ProfileV2>> {
        let sql = format!("SELECT {COLUMNS} FROM users_arrows ORDER BY id");
        let users = sqlx::query_as::<_, ProfileV2>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create(&self, p: &ProfileV2) -> Result<()> {
        let sql = format!(
            "INSERT INTO users_arrows ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"
        );

        sqlx::query(&sql)
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
            .execute(&self.pool)
            .await
            .map_err(|e| GameError::from_insert(e, "Profile", "id", &p.id))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ProfileV2>> {
        let sql = format!("SELECT {COLUMNS} FROM users_arrows WHERE id = $1");
        let user = sqlx::query_as::<_, ProfileV2>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update(&self, id: &str, p: &ProfileV2) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users_arrows
            SET id = $2, lvl_ok = $3, all_ok = $4, hint_fstep = $5, hint_back = $6,
                live_count = $7, live_time = $8, price_time = $9, game_time = $10,
                game_points = $11, game_lvl_try = $12, sound = $13, music = $14,
                reserve_1 = $15, reserve_2 = $16, reserve_3 = $17, reserve_4 = $18,
                version = version + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
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
        .execute(&self.pool)
        .await
        .map_err(|e| GameError::from_insert(e, "Profile", "id", &p.id))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users_arrows WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
