use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::auth::TOKEN_COOKIE;
use crate::error::AppError;
use crate::AppState;

/// The owner identity resolved for a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub user_id: String,
    pub display_name: String,
}

/// Session token from the `token` cookie, falling back to `Authorization: Bearer`.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = session_token(req.headers()) else {
        tracing::debug!(path = %req.uri().path(), "No session token on request");
        return Err(AppError::Unauthorized);
    };

    let token_data = verify_token(&token, &state.config)?;

    // The account must still exist; a valid signature alone is not enough.
    let user = state
        .store
        .find_user_by_id(token_data.claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user = %token_data.claims.sub, "Session token for unknown user");
            AppError::Unauthorized
        })?;

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        user_id: user.user_id,
        display_name: user.display_name,
    });
    Ok(next.run(req).await)
}
