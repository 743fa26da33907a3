//! 启动时的旧版档案迁移
//!
//! 读取全部旧版档案，转换为当前结构后逐个写入。已存在的 id 跳过，
//! 单条写入失败记录日志后继续；只有读取旧版档案失败才会中止启动。

use game_shared::error::{GameError, Result};
use game_shared::observability::metrics;
use game_shared::profile::migrate_v1_to_v2;
use tracing::{error, info, instrument, warn};

use crate::repository::{LegacyProfileRepositoryTrait, UserRepositoryTrait};

/// 迁移结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub found: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 将旧版档案复制到当前集合
#[instrument(skip_all)]
pub async fn migrate_legacy_profiles(
    legacy: &dyn LegacyProfileRepositoryTrait,
    users: &dyn UserRepositoryTrait,
) -> Result<MigrationReport> {
    let old_profiles = legacy.list_all().await?;

    let mut report = MigrationReport {
        found: old_profiles.len(),
        ..Default::default()
    };
    info!(found = report.found, "开始迁移旧版档案");

    for old in &old_profiles {
        match users.create(&migrate_v1_to_v2(old)).await {
            Ok(()) => {
                report.migrated += 1;
                metrics::record_legacy_migration("migrated");
            }
            Err(GameError::AlreadyExists { .. }) => {
                report.skipped += 1;
                metrics::record_legacy_migration("skipped");
                warn!(user_id = %old.id, "档案已存在，跳过");
            }
            Err(e) => {
                report.failed += 1;
                metrics::record_legacy_migration("failed");
                error!(user_id = %old.id, error = %e, "档案迁移失败");
            }
        }
    }

    info!(
        found = report.found,
        migrated = report.migrated,
        skipped = report.skipped,
        failed = report.failed,
        "旧版档案迁移完成"
    );

    Ok(report)
}
