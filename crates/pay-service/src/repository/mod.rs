//! 支付仓储层
//!
//! 订单、订单号计数器与商品橱窗的数据访问。每个接口都有 PostgreSQL 与内存两种实现，
//! 服务层只依赖 trait。

mod catalog_repo;
mod memory;
mod order_repo;
mod sequence_repo;
mod traits;

pub use catalog_repo::PgCatalogRepository;
pub use memory::{
    MemoryCatalogRepository, MemoryOrderRepository, MemoryRepositories, MemorySequenceGenerator,
};
pub use order_repo::PgOrderRepository;
pub use sequence_repo::PgSequenceGenerator;
pub use traits::*;
