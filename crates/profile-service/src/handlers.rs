//! 档案 CRUD 处理器
//!
//! 请求体不要求 `Content-Type: application/json`，直接按 JSON 解析。

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use game_shared::error::GameError;
use game_shared::http::MessageResponse;
use game_shared::profile::ProfileV2;
use tracing::info;
use validator::Validate;

use crate::dto::ProfilePayload;
use crate::error::{ProfileServiceError, Result};
use crate::state::AppState;

fn parse_body(body: &[u8]) -> Result<ProfileV2> {
    let payload: ProfilePayload = serde_json::from_slice(body)
        .map_err(|e| ProfileServiceError::IncorrectBody(e.to_string()))?;
    payload
        .validate()
        .map_err(|e| ProfileServiceError::IncorrectBody(e.to_string()))?;
    Ok(payload.profile)
}

/// 201 + `Location: /users/{id}` + 档案本身
fn created(profile: ProfileV2) -> Response {
    let location = format!("/users/{}", profile.id);
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(profile),
    )
        .into_response()
}

/// 列出全部档案
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<ProfileV2>>> {
    let users = state
        .users
        .list()
        .await
        .map_err(ProfileServiceError::ListFailed)?;
    info!(count = users.len(), "列出全部档案");
    Ok(Json(users))
}

/// 创建档案
pub async fn create_user(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let profile = parse_body(&body)?;

    state.users.create(&profile).await.map_err(|e| match e {
        GameError::AlreadyExists { .. } => ProfileServiceError::UserExists(profile.id.clone()),
        other => ProfileServiceError::InsertFailed(other),
    })?;

    info!(user_id = %profile.id, "档案已创建");
    Ok(created(profile))
}

/// 按 id 查询档案，空 id 的记录视同不存在
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileV2>> {
    let profile = state
        .users
        .get(&id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %id, error = %e, "档案查询失败");
            ProfileServiceError::UserNotFound(id.clone())
        })?
        .filter(|p| !p.id.is_empty())
        .ok_or_else(|| ProfileServiceError::UserNotFound(id.clone()))?;

    Ok(Json(profile))
}

/// 整体替换档案
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let profile = parse_body(&body)?;

    let updated = state
        .users
        .update(&id, &profile)
        .await
        .map_err(ProfileServiceError::UpdateFailed)?;
    if !updated {
        return Err(ProfileServiceError::UserNotFound(id));
    }

    info!(user_id = %id, new_id = %profile.id, "档案已更新");
    Ok(created(profile))
}

/// 删除档案
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<MessageResponse> {
    let removed = state
        .users
        .delete(&id)
        .await
        .map_err(ProfileServiceError::DeleteFailed)?;
    if !removed {
        return Err(ProfileServiceError::UserNotFound(id));
    }

    info!(user_id = %id, "档案已删除");
    Ok(MessageResponse::new("ok"))
}

/// 健康检查
pub async fn healthcheck() -> MessageResponse {
    MessageResponse::new("passed")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use game_shared::test_utils::sample_profile_v2;
    use serde_json::{Value, json};

    use super::*;
    use crate::repository::MockUserRepositoryTrait;

    fn store_down() -> GameError {
        GameError::Database(sqlx::Error::PoolTimedOut)
    }

    fn state(users: MockUserRepositoryTrait) -> State<AppState> {
        State(AppState::new(Arc::new(users)))
    }

    fn profile_bytes(id: &str) -> Bytes {
        Bytes::from(serde_json::to_vec(&sample_profile_v2(id)).unwrap())
    }

    async fn message(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_store_failure() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_list().returning(|| Err(store_down()));

        let (status, body) = message(list_users(state(users)).await.into_response()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Database error"}));
    }

    #[tokio::test]
    async fn test_create_store_failure_is_not_duplicate() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_create().returning(|_| Err(store_down()));

        let response = create_user(state(users), profile_bytes("42")).await.into_response();
        let (status, body) = message(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Failed insert user"}));
    }

    #[tokio::test]
    async fn test_get_store_failure_reads_as_not_found() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_get().returning(|_| Err(store_down()));

        let response = get_user(state(users), Path("42".to_string())).await.into_response();
        assert_eq!(message(response).await.1, json!({"message": "User not found"}));
    }

    #[tokio::test]
    async fn test_update_store_failure() {
        let mut users = MockUserRepositoryTrait::new();
        users
            .expect_update()
            .withf(|id, profile| id == "42" && profile.id == "42")
            .returning(|_, _| Err(store_down()));

        let response = update_user(state(users), Path("42".to_string()), profile_bytes("42"))
            .await
            .into_response();
        assert_eq!(message(response).await.1, json!({"message": "Failed update user"}));
    }

    #[tokio::test]
    async fn test_delete_distinguishes_missing_from_failure() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_delete().returning(|_| Err(store_down()));
        let response = delete_user(state(users), Path("42".to_string())).await.into_response();
        assert_eq!(message(response).await.1, json!({"message": "Failed delete user"}));

        let mut users = MockUserRepositoryTrait::new();
        users.expect_delete().returning(|_| Ok(false));
        let response = delete_user(state(users), Path("42".to_string())).await.into_response();
        assert_eq!(message(response).await.1, json!({"message": "User not found"}));
    }

    #[tokio::test]
    async fn test_invalid_body_never_reaches_store() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_create().never();

        let response = create_user(state(users), Bytes::from_static(br#"{"id": "  "}"#))
            .await
            .into_response();
        let (status, body) = message(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Incorrect body"}));
    }
}
