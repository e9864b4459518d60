//! # Server crate — JSON over HTTP for the notes service
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`settings`] | Layered configuration: defaults, `config.toml`, environment |
//! | [`state`] | The services shared by all handlers |
//! | [`routes`] | The route table and its handlers |
//! | [`routes::docs`] | OpenAPI document and Swagger UI paths |
//!
//! Authentication is a session token carried as `Authorization: Bearer <token>`
//! or in the `tokenJWT` cookie set by `POST /login`. The OpenAPI document is
//! served at `/api-docs/openapi.json` and browsable at `/swagger`.

mod error;
mod extract;
pub mod routes;
pub mod settings;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use extract::AuthUser;
pub use routes::docs::ApiDoc;
pub use routes::router;
pub use settings::Settings;
pub use state::AppState;
