//! 应用状态定义

use std::sync::Arc;

use crate::repository::UserRepositoryTrait;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepositoryTrait>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { users }
    }
}
