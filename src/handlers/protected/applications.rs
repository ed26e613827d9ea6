use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::application::{Application, ApplicationDraft};
use crate::database::repository::ApplicationRepository;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// POST /applications - the single draft/submit save operation.
///
/// Every wizard step posts the full form snapshot here; final submission
/// is the same call with a filtered projects list. Without an id the
/// snapshot becomes a new record (201); with an id the existing record
/// is fully replaced (200), 404 if the id is unknown, 403 if it belongs
/// to someone else.
pub async fn save(
    Extension(auth_user): Extension<AuthUser>,
    Json(draft): Json<ApplicationDraft>,
) -> ApiResult<Application> {
    let field_errors = draft.validate();
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Validation failed", Some(field_errors)));
    }

    let repo = ApplicationRepository::new().await?;
    let (application, created) = repo.save(auth_user.user_id, &draft).await?;

    if created {
        tracing::info!(
            "Created application {} for user {}",
            application.id,
            auth_user.user_id
        );
    }

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok(ApiResponse::with_status(application, status))
}

/// GET /applications - records owned by the caller
pub async fn list(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Vec<Application>> {
    let repo = ApplicationRepository::new().await?;
    let applications = repo.list_owned(auth_user.user_id).await?;
    Ok(ApiResponse::success(applications))
}

/// GET /applications/:id - single record, ownership-checked
pub async fn get(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Application> {
    let repo = ApplicationRepository::new().await?;
    let application = repo.fetch_owned(id, auth_user.user_id).await?;
    Ok(ApiResponse::success(application))
}

/// DELETE /applications/:id - permanent, ownership-checked removal
pub async fn remove(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let repo = ApplicationRepository::new().await?;
    repo.delete_owned(id, auth_user.user_id).await?;

    tracing::info!("Deleted application {} for user {}", id, auth_user.user_id);
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
