use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use validator::Validate;

use crate::auth::{
    jwt::create_session_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
    TOKEN_COOKIE,
};
use crate::error::{AppError, AppResult};
use crate::models::user::{
    LoginRequest, LoginResponse, NewUser, RegisterRequest, RegisterResponse, UserProfile,
    DEFAULT_DISPLAY_NAME,
};
use crate::AppState;

/// Presence check for credentials. Never trims: passwords keep their
/// surrounding whitespace, and callers trim `userId` before passing it in.
/// Diary fields use `services::diary::required`, which trims for the check.
fn required(value: Option<&str>, message: &str) -> AppResult<String> {
    value
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(message.into()))
}

fn session_cookie(token: String, state: &AppState) -> Cookie<'static> {
    let same_site = if state.config.production {
        SameSite::None
    } else {
        SameSite::Lax
    };

    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.production)
        .same_site(same_site)
        .max_age(time::Duration::seconds(state.config.jwt_ttl_secs))
        .build()
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    const MISSING: &str = "userId and password are required";
    let user_id = required(body.user_id.as_deref().map(str::trim), MISSING)?;
    let password = required(body.password.as_deref(), MISSING)?;
    body.validate()?;

    let display_name = body
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string();

    let new_user = NewUser {
        user_id,
        password_hash: hash_password(&password)?,
        display_name,
    };

    let user = state.store.insert_user(&new_user).await?.ok_or_else(|| {
        tracing::info!(user_id = %new_user.user_id, "Registration for taken user id");
        AppError::Conflict("User id is already taken".into())
    })?;

    tracing::info!(user = %user.id, user_id = %user.user_id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".into(),
            id: user.user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    const MISSING: &str = "userId and password are required";
    let user_id = required(body.user_id.as_deref().map(str::trim), MISSING)?;
    let password = required(body.password.as_deref(), MISSING)?;

    let user = state
        .store
        .find_user_by_login(&user_id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&password, &user.password_hash)? {
        tracing::info!(user_id = %user_id, "Login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_session_token(&user, &state.config)?;
    let jar = jar.add(session_cookie(token.clone(), &state));

    tracing::info!(user = %user.id, "User logged in");
    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".into(),
            token,
            display_name: user.display_name,
            user_id: user.user_id,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(auth_user): Extension<AuthUser>,
) -> (CookieJar, Json<serde_json::Value>) {
    tracing::info!(user = %auth_user.id, "User logged out");
    // The jar only emits removals for cookies the request carried. Browsers
    // drop a SameSite=None cookie without Secure, so reuse the login attributes.
    let mut removal = session_cookie(String::new(), &state);
    removal.make_removal();
    let jar = jar.add(removal);
    (
        jar,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    )
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .store
        .find_user_by_id(auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
