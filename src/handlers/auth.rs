use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts},
    response::Json,
};
use serde::Deserialize;
use tracing::{info, instrument};

use super::errors::{auth_error_to_response, bad_request, ApiError};
use crate::app::AppState;
use crate::models::{AuthError, AuthUser, TokenResponse};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub email: String,
}

/// Resolves the caller from `Authorization: Bearer role:uid:email`.
/// Routes that allow anonymous access take `Option<AuthUser>` instead.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_user(parts).map_err(auth_error_to_response)
    }
}

fn bearer_user(parts: &Parts) -> Result<AuthUser, AuthError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken {
            reason: "authorization header is not valid ASCII".to_string(),
        })?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or_else(|| AuthError::InvalidToken {
            reason: "expected a bearer token".to_string(),
        })?;

    AuthUser::from_token(token.trim())
}

/// Capability check for admin-only routes
pub(crate) fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    user.ensure_admin().map_err(|e| {
        crate::warn_with_trace!(user_id = %user.id, "Admin route called by non-admin");
        auth_error_to_response(e)
    })
}

/// Mock login
#[instrument(name = "mock_login", skip(state, query))]
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = query.email.trim();
    if email.is_empty() {
        return Err(bad_request("email is required"));
    }

    let user = AuthUser::mock_login(email, &state.admin_email);
    info!(user_id = %user.id, role = %user.role, "Issued mock token");

    Ok(Json(user.to_token_response()))
}

#[instrument(name = "current_user", skip(user), fields(user_id = %user.id))]
pub async fn current_user(user: AuthUser) -> Json<AuthUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use crate::models::Role;

    fn parts_with(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_extracts_bearer_user() {
        let mut parts = parts_with(Some("Bearer admin:12345:test@admin.com"));
        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, "12345");
        assert_eq!(user.email, "test@admin.com");
    }

    #[tokio::test]
    async fn test_missing_or_malformed_token_is_unauthorized() {
        for header_value in [None, Some("Basic abc"), Some("Bearer nonsense")] {
            let mut parts = parts_with(header_value);
            let (status, _) = AuthUser::from_request_parts(&mut parts, &())
                .await
                .unwrap_err();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_optional_user_without_header() {
        let mut parts = parts_with(None);
        let user = Option::<AuthUser>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn test_require_admin() {
        let admin = AuthUser::mock_login("test@admin.com", "test@admin.com");
        let user = AuthUser::mock_login("diner@example.com", "test@admin.com");

        assert!(require_admin(&admin).is_ok());
        assert_eq!(require_admin(&user).unwrap_err().0, StatusCode::FORBIDDEN);
    }
}
