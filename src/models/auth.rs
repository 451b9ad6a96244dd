use serde::{Deserialize, Serialize};

use super::{AuthError, Role};

pub const ADMIN_USER_ID: &str = "12345";
pub const DEFAULT_USER_ID: &str = "67890";
pub const TOKEN_TYPE: &str = "bearer";

/// Caller identity decoded from a mock bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Response body of the mock login endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl AuthUser {
    /// Mock login. The configured admin email gets the admin role, everyone
    /// else is a plain user.
    pub fn mock_login(email: &str, admin_email: &str) -> Self {
        if email.eq_ignore_ascii_case(admin_email) {
            Self {
                id: ADMIN_USER_ID.to_string(),
                email: email.to_string(),
                role: Role::Admin,
            }
        } else {
            Self {
                id: DEFAULT_USER_ID.to_string(),
                email: email.to_string(),
                role: Role::User,
            }
        }
    }

    /// Tokens have the shape `role:uid:email`
    pub fn to_token(&self) -> String {
        format!("{}:{}:{}", self.role, self.id, self.email)
    }

    pub fn from_token(token: &str) -> Result<Self, AuthError> {
        let mut parts = token.splitn(3, ':');
        let (Some(role), Some(id), Some(email)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidToken {
                reason: "expected role:uid:email".to_string(),
            });
        };

        let role = role
            .parse::<Role>()
            .map_err(|reason| AuthError::InvalidToken { reason })?;

        if id.is_empty() || email.is_empty() {
            return Err(AuthError::InvalidToken {
                reason: "empty uid or email".to_string(),
            });
        }

        Ok(Self {
            id: id.to_string(),
            email: email.to_string(),
            role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn ensure_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    pub fn to_token_response(&self) -> TokenResponse {
        TokenResponse {
            access_token: self.to_token(),
            token_type: TOKEN_TYPE.to_string(),
        }
    }
}
