use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use api::auth::{TOKEN_COOKIE, TOKEN_TTL_HOURS};
use store::{Store, UserProfile};

use super::body;
use crate::error::{ApiResult, ErrorBody};
use crate::extract::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[utoipa::path(post, path = "/register", tag = "Users",
    request_body = Credentials,
    responses(
        (status = 201, description = "Registered", body = UserProfile),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 409, description = "Username taken", body = ErrorBody),
    ))]
pub async fn register<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let credentials = body(payload)?;
    let user = state
        .users
        .register(&credentials.username, &credentials.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user.to_profile())))
}

/// Returns the token in the body and also sets it as an HTTP-only cookie.
#[utoipa::path(post, path = "/login", tag = "Users",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in; also sets the tokenJWT cookie", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    ))]
pub async fn login<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let credentials = body(payload)?;
    let token = state
        .users
        .login(&credentials.username, &credentials.password)
        .await?;

    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(TOKEN_TTL_HOURS))
        .build();

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(LoginResponse {
            message: "login successful".to_string(),
            token,
        }),
    ))
}

#[utoipa::path(get, path = "/profile", tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's profile", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ))]
pub async fn profile<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.users.profile(user_id).await?))
}
