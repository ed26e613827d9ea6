use axum::extract::Extension;
use serde_json::{json, Value};

use crate::database::models::user::PublicUser;
use crate::database::repository::UserRepository;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /profile - current user as resolved from the bearer token
pub async fn profile(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let users = UserRepository::new().await?;
    let user = users
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(json!({ "user": PublicUser::from(&user) })))
}
