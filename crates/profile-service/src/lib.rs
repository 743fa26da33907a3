//! 用户档案服务
//!
//! 提供当前版档案（`users_arrows`）的 REST CRUD，并在启动时把旧版档案迁移到当前集合。
//!
//! ## 模块结构
//!
//! - `repository`: 当前版与旧版档案仓储
//! - `migration`: 启动迁移
//! - `handlers` / `routes`: HTTP 接口
//! - `dto` / `error`: 请求体校验与错误响应

pub mod dto;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::{ProfileServiceError, Result};
pub use migration::{MigrationReport, migrate_legacy_profiles};
pub use state::AppState;
