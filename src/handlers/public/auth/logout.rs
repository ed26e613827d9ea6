use serde_json::{json, Value};

use crate::middleware::response::{ApiResponse, ApiResult};

/// POST /logout - tokens are stateless and never stored server-side, so
/// logout just acknowledges; the client discards its token.
pub async fn logout() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "message": "Logged out" })))
}
