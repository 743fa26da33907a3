//! 共享库
//!
//! 包含支付服务与用户档案服务共用的配置、错误处理、数据库连接、
//! 可观测性、HTTP 公共层，以及用户档案领域模型与效果规则。

pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod memory_store;
pub mod numeric;
pub mod observability;
pub mod profile;
pub mod test_utils;
