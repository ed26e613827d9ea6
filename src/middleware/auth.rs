use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use uuid::Uuid;

use crate::auth::{decode_with_secret, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated identity extracted from the bearer token and attached
/// to the request for every ownership-scoped operation downstream
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        // A verified token without an identity claim means the minting
        // side broke the payload contract; not the client's fault.
        let user_id = claims.user_id.ok_or_else(|| {
            ApiError::payload_malformed("Token payload is missing the user_id claim")
        })?;
        Ok(Self {
            user_id,
            email: claims.email,
        })
    }
}

/// Bearer-token authentication middleware. Runs before every
/// identity-scoped route; on success the resolved [`AuthUser`] is
/// available as a request extension.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let claims = validate_token(&token)?;

    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header. The header
/// is the only accepted transport; there is no cookie fallback.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| ApiError::authentication_required("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::authentication_required("Invalid Authorization header format"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            ApiError::authentication_required("Authorization header must use Bearer token format")
        })?
        .trim();

    if token.is_empty() {
        return Err(ApiError::authentication_required("Empty bearer token"));
    }
    Ok(token.to_string())
}

/// Validate signature and expiry against the shared secret. Expiry gets
/// its own error so clients can redirect to re-authentication instead
/// of showing a generic failure.
fn validate_token(token: &str) -> Result<Claims, ApiError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        tracing::error!("JWT secret not configured");
        return Err(ApiError::internal_server_error("Authentication is not configured"));
    }

    decode_with_secret(token, secret).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            ApiError::token_expired("Token expired, please sign in again")
        }
        _ => ApiError::token_invalid("Invalid or malformed token"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::sign_with_secret;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    fn signed_claims(user_id: Option<Uuid>, exp_offset: Duration) -> String {
        let claims = Claims {
            user_id,
            email: "jane@x.com".to_string(),
            exp: (Utc::now() + exp_offset).timestamp(),
            iat: Utc::now().timestamp(),
        };
        sign_with_secret(&claims, &config::config().security.jwt_secret).unwrap()
    }

    #[test]
    fn missing_header_requires_authentication() {
        let err = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_REQUIRED");
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = extract_bearer_token(&headers_with("Basic abc123")).unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_REQUIRED");
    }

    #[test]
    fn empty_bearer_token_is_rejected() {
        let err = extract_bearer_token(&headers_with("Bearer   ")).unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_REQUIRED");
    }

    #[test]
    fn bearer_token_is_extracted() {
        let token = extract_bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn expired_token_maps_to_token_expired() {
        let token = signed_claims(Some(Uuid::new_v4()), Duration::hours(-2));
        let err = validate_token(&token).unwrap_err();
        assert_eq!(err.error_code(), "TOKEN_EXPIRED");
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn tampered_token_maps_to_token_invalid() {
        let mut token = signed_claims(Some(Uuid::new_v4()), Duration::hours(1));
        token.push('x');
        let err = validate_token(&token).unwrap_err();
        assert_eq!(err.error_code(), "TOKEN_INVALID");
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn valid_token_resolves_auth_user() {
        let user_id = Uuid::new_v4();
        let token = signed_claims(Some(user_id), Duration::hours(1));
        let claims = validate_token(&token).unwrap();
        let auth_user = AuthUser::try_from(claims).unwrap();
        assert_eq!(auth_user.user_id, user_id);
        assert_eq!(auth_user.email, "jane@x.com");
    }

    #[test]
    fn missing_identity_claim_is_a_payload_violation() {
        let token = signed_claims(None, Duration::hours(1));
        let claims = validate_token(&token).unwrap();
        let err = AuthUser::try_from(claims).unwrap_err();
        assert_eq!(err.error_code(), "PAYLOAD_MALFORMED");
        assert_eq!(err.status_code(), 500);
    }
}
