use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// HTTP face of [`api::Error`].
#[derive(Debug)]
pub struct ApiError(pub api::Error);

impl From<api::Error> for ApiError {
    fn from(err: api::Error) -> Self {
        Self(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

pub fn status(err: &api::Error) -> StatusCode {
    use api::Error::*;
    match err {
        Validation(_) => StatusCode::BAD_REQUEST,
        Unauthenticated(_) | InvalidCredentials => StatusCode::UNAUTHORIZED,
        Forbidden | SelfShare => StatusCode::FORBIDDEN,
        NotFound(_) | TagNotFound => StatusCode::NOT_FOUND,
        Conflict(_) => StatusCode::CONFLICT,
        Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
