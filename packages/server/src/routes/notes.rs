use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use api::Page;
use store::{NewNote, Note, NoteId, Store, UserId};

use super::body;
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::extract::AuthUser;
use crate::state::AppState;

/// Raw paging parameters. Anything that is not an integer falls back to the
/// default instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number, default 1.
    pub page: Option<String>,
    /// Page size, default 10.
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TagQuery {
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TagInput {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShareRequest {
    pub user_id: UserId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

fn note_id(raw: &str) -> Result<NoteId, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| api::Error::validation("note id must be an integer").into())
}

fn integer(raw: Option<String>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[utoipa::path(post, path = "/notes", tag = "Notes",
    security(("bearer" = [])),
    request_body = NewNote,
    responses(
        (status = 201, description = "Created", body = Note),
        (status = 400, description = "Blank or oversized title or content", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ))]
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let note = state.notes.create(user_id, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(get, path = "/notes", tag = "Notes",
    security(("bearer" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "The caller's notes, newest first, with tags", body = Vec<Note>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ))]
pub async fn list<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Note>>> {
    let page = Page::new(integer(params.page), integer(params.limit));
    Ok(Json(state.notes.list(user_id, page).await?))
}

#[utoipa::path(get, path = "/notes/{id}", tag = "Notes",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Note ID")),
    responses(
        (status = 200, description = "The note with its tags", body = Note),
        (status = 404, description = "No such note, or not the caller's", body = ErrorBody),
    ))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    Ok(Json(state.notes.get(note_id(&id)?, user_id).await?))
}

#[utoipa::path(put, path = "/notes/{id}", tag = "Notes",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Note ID")),
    request_body = NewNote,
    responses(
        (status = 200, description = "Updated", body = Note),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody),
    ))]
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let id = note_id(&id)?;
    let note = state.notes.update(id, body(payload)?, user_id).await?;
    Ok(Json(note))
}

#[utoipa::path(delete, path = "/notes/{id}", tag = "Notes",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Deleted", body = Message),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody),
    ))]
pub async fn remove<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    state.notes.delete(note_id(&id)?, user_id).await?;
    Ok(Message::new("note deleted"))
}

/// Responds with the note and its full tag set.
#[utoipa::path(post, path = "/notes/{id}/tags", tag = "Tags",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Note ID")),
    request_body = Vec<TagInput>,
    responses(
        (status = 200, description = "The note with its full tag set", body = Note),
        (status = 400, description = "Blank or oversized tag name", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody),
    ))]
pub async fn add_tags<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<Vec<TagInput>>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let id = note_id(&id)?;
    let names: Vec<String> = body(payload)?.into_iter().map(|t| t.name).collect();
    state.notes.add_tags(id, names, user_id).await?;
    Ok(Json(state.notes.get(id, user_id).await?))
}

/// Notes of every owner carrying the tag. Any authenticated caller may search;
/// anonymous requests are rejected.
#[utoipa::path(get, path = "/notes/tags", tag = "Tags",
    security(("bearer" = [])),
    params(TagQuery),
    responses(
        (status = 200, description = "Notes carrying the tag", body = Vec<Note>),
        (status = 400, description = "Missing tag parameter", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No note carries the tag", body = ErrorBody),
    ))]
pub async fn by_tag<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(_): AuthUser,
    Query(query): Query<TagQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    let tag = query.tag.unwrap_or_default();
    Ok(Json(state.notes.list_by_tag(&tag).await?))
}

#[utoipa::path(post, path = "/notes/{id}/share", tag = "Sharing",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Note ID")),
    request_body = ShareRequest,
    responses(
        (status = 200, description = "Shared (repeating a share is a no-op)", body = Message),
        (status = 403, description = "Not the owner, or sharing with oneself", body = ErrorBody),
        (status = 404, description = "No such note or user", body = ErrorBody),
    ))]
pub async fn share<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let id = note_id(&id)?;
    let request = body(payload)?;
    state.notes.share(id, user_id, request.user_id).await?;
    Ok(Message::new("note shared"))
}

#[utoipa::path(get, path = "/shared-notes", tag = "Sharing",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Notes other users shared with the caller", body = Vec<Note>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ))]
pub async fn shared<S: Store>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Note>>> {
    Ok(Json(state.notes.list_shared(user_id).await?))
}
