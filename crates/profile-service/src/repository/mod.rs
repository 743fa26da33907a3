//! 档案服务仓储层
//!
//! 当前版档案（`users_arrows`）的增删改查，以及旧版档案（`arrows_users`）的只读访问。

mod legacy_repo;
mod memory;
mod traits;
mod user_repo;

pub use legacy_repo::PgLegacyProfileRepository;
pub use memory::{MemoryLegacyProfileRepository, MemoryUserRepository};
pub use traits::*;
pub use user_repo::PgUserRepository;
