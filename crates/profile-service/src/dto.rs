//! 请求数据传输对象

use game_shared::profile::ProfileV2;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// 创建/整体更新档案的请求体，字段与档案 JSON 一致
#[derive(Debug, Deserialize, Validate)]
#[serde(transparent)]
pub struct ProfilePayload {
    #[validate(custom(function = "validate_profile_id"))]
    pub profile: ProfileV2,
}

fn validate_profile_id(profile: &ProfileV2) -> Result<(), ValidationError> {
    if profile.id.trim().is_empty() {
        return Err(ValidationError::new("empty_id").with_message("id 不能为空".into()));
    }
    Ok(())
}
