use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use cookie::Cookie;

use api::auth::{TokenError, TOKEN_COOKIE};
use store::{Store, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// The caller, as proven by a session token in `Authorization: Bearer` or the
/// `tokenJWT` cookie. The header wins when both are present.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

impl<S: Store> FromRequestParts<AppState<S>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(api::Error::Unauthenticated(TokenError::Missing))?;
        let user_id = state
            .users
            .tokens()
            .validate(&token)
            .map_err(api::Error::from)?;
        Ok(AuthUser(user_id))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    // Auth schemes are case-insensitive
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
}
