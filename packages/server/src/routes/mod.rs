//! HTTP routes. Handlers parse ids and bodies, then defer to the services in
//! [`AppState`]; every failure renders as `{"error": ...}` via [`ApiError`].

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use store::Store;

use crate::error::ApiError;
use crate::state::AppState;

pub mod docs;
pub mod notes;
pub mod users;

use docs::{ApiDoc, OPENAPI_PATH, SWAGGER_PATH};

pub fn router<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(users::register::<S>))
        .route("/login", post(users::login::<S>))
        .route("/profile", get(users::profile::<S>))
        .route("/notes", post(notes::create::<S>).get(notes::list::<S>))
        .route("/notes/tags", get(notes::by_tag::<S>))
        .route(
            "/notes/{id}",
            get(notes::show::<S>)
                .put(notes::update::<S>)
                .delete(notes::remove::<S>),
        )
        .route("/notes/{id}/tags", post(notes::add_tags::<S>))
        .route("/notes/{id}/share", post(notes::share::<S>))
        .route("/shared-notes", get(notes::shared::<S>))
        .merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is up", body = String)))]
async fn health() -> &'static str {
    "OK"
}

/// Unwrap a JSON body, reporting a malformed one as a validation failure.
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| api::Error::validation(rejection.body_text()).into())
}
