//! 支付服务
//!
//! 接收应用内购买通知，校验后分配订单号、写入订单，并把商品效果应用到收货人档案。
//!
//! ## 模块结构
//!
//! - `notification`: 通知体解码与下单校验
//! - `repository`: 订单、计数器、商品橱窗仓储
//! - `service`: 购买处理与档案效果
//! - `handlers` / `routes`: HTTP 接口
//! - `error` / `dto`: 错误码与响应信封

pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notification;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

pub use error::{PayError, Result};
pub use models::{CatalogItem, ItemResponse, Order, OrderChannel, OrderReceipt};
pub use state::AppState;
