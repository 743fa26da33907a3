//! 订单号计数器

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::SequenceGeneratorTrait;
use game_shared::error::Result;

/// PostgreSQL 计数器
///
/// 递增在单条语句内完成，多个实例并发调用也不会拿到重复值
pub struct PgSequenceGenerator {
    pool: PgPool,
}

impl PgSequenceGenerator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SequenceGeneratorTrait for PgSequenceGenerator {
    async fn next(&self, counter: &str) -> Result<i64> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (name, seq)
            VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET seq = counters.seq + 1
            RETURNING seq
            "#,
        )
        .bind(counter)
        .fetch_one(&self.pool)
        .await?;

        Ok(seq)
    }
}
