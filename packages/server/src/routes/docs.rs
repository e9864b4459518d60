//! OpenAPI description of the routes, served at [`OPENAPI_PATH`] and browsable
//! through Swagger UI at [`SWAGGER_PATH`].

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use store::{NewNote, Note, Tag, UserProfile};

use super::{notes, users};
use crate::error::ErrorBody;

pub const SWAGGER_PATH: &str = "/swagger";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes API",
        description = "Personal notes with tags and read-only sharing"
    ),
    paths(
        super::health,
        users::register, users::login, users::profile,
        notes::create, notes::list, notes::show, notes::update, notes::remove,
        notes::add_tags, notes::by_tag, notes::share, notes::shared,
    ),
    components(schemas(
        Note, NewNote, Tag, UserProfile, ErrorBody,
        users::Credentials, users::LoginResponse,
        notes::TagInput, notes::ShareRequest, notes::Message,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Users", description = "Registration, login and profile"),
        (name = "Notes", description = "Owner-only note CRUD"),
        (name = "Tags", description = "Tagging and search by tag"),
        (name = "Sharing", description = "Read-only grants to other users"),
        (name = "System", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme the authenticated paths refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
