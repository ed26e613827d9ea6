use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::database::models::user::PublicUser;
use crate::database::repository::UserRepository;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login - authenticate credentials and issue a bearer token.
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let email = payload.email.trim().to_lowercase();

    let users = UserRepository::new().await?;
    let user = users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::authentication_required("Invalid credentials"))?;

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::authentication_required("Invalid credentials"));
    }

    let token = auth::generate_token(&Claims::new(user.id, user.email.clone()))?;

    tracing::debug!("User {} logged in", user.id);
    Ok(ApiResponse::success(json!({
        "token": token,
        "user": PublicUser::from(&user),
    })))
}
