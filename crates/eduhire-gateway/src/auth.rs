//! Authenticated request context.
//!
//! Token issuance happens upstream. The gateway trusts the `X-User-Id`
//! header and, in `token` mode, also requires the shared bearer token.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use eduhire_core::config::AuthMode;
use eduhire_core::EduhireError;
use eduhire_users::User;

use crate::app::AppState;
use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The calling user, loaded fresh for this request.
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if !check_token(&state.config.gateway.auth, &parts.headers) {
            return Err(unauthorized("missing or invalid bearer token"));
        }

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| unauthorized("missing X-User-Id header"))?;

        match state.users.get(user_id)? {
            Some(user) => Ok(AuthUser(user)),
            None => Err(unauthorized("unknown user")),
        }
    }
}

fn check_token(auth: &eduhire_core::config::AuthConfig, headers: &HeaderMap) -> bool {
    match auth.mode {
        AuthMode::Header => true,
        AuthMode::Token => {
            let expected = match &auth.token {
                Some(t) => t.as_str(),
                // Token mode configured but no token value: deny.
                None => return false,
            };
            extract_bearer(headers)
                .map(|t| t == expected)
                .unwrap_or(false)
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized(msg: &str) -> ApiError {
    ApiError(EduhireError::Unauthorized(msg.to_string()))
}
