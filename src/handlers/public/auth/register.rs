use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{self, Claims};
use crate::database::models::user::PublicUser;
use crate::database::repository::UserRepository;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::validation::{is_valid_email, MIN_PASSWORD_LENGTH};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /register - create an account and issue a bearer token
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    let mut field_errors = HashMap::new();
    let email = payload.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        field_errors.insert("email".to_string(), "Invalid email format".to_string());
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Validation failed", Some(field_errors)));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let users = UserRepository::new().await?;
    let user = users.create(&email, &password_hash).await?;

    let token = auth::generate_token(&Claims::new(user.id, user.email.clone()))?;

    tracing::info!("Registered user {}", user.id);
    Ok(ApiResponse::created(json!({
        "token": token,
        "user": PublicUser::from(&user),
    })))
}
