//! # Store — the storage collaborator behind the notes core
//!
//! [`Store`] is the async seam between the access-control core and whatever holds
//! durable state. The same trait is implemented by [`crate::MemoryStore`] (tests,
//! local runs) and by the PostgreSQL store in the `api` crate.
//!
//! Implementations must uphold the relational constraints of the schema:
//!
//! - usernames and tag names are unique ([`StoreError::Duplicate`] on a second
//!   user insert, idempotent return of the existing row for tags);
//! - `note_tags` and `note_access` are unique pairs, and inserting an existing
//!   pair is a no-op;
//! - every reference must resolve ([`StoreError::MissingReference`]);
//! - deleting a note removes its tag links and access grants.
//!
//! Conditional writes ([`Store::update_owned_note`], [`Store::delete_owned_note`])
//! match on both the note id and the owner in one statement, so an ownership check
//! and the mutation it guards cannot interleave with another writer.

use std::future::Future;

use thiserror::Error;

use crate::models::{NewNote, Note, NoteAccess, NoteId, Tag, TagId, User, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the insert.
    #[error("duplicate {0}")]
    Duplicate(&'static str),
    /// A foreign key did not resolve.
    #[error("missing referenced {0}")]
    MissingReference(&'static str),
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Every returned future is `Send`, so the store can sit behind a multi-threaded
/// server.
pub trait Store: Send + Sync + 'static {
    /// Insert a user; fails with [`StoreError::Duplicate`] if the username is taken.
    fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl Future<Output = StoreResult<User>> + Send;

    fn user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn user_by_id(&self, id: UserId) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn insert_note(
        &self,
        owner_id: UserId,
        note: &NewNote,
    ) -> impl Future<Output = StoreResult<Note>> + Send;

    fn note_by_id(&self, id: NoteId) -> impl Future<Output = StoreResult<Option<Note>>> + Send;

    /// Notes owned by `owner_id`, newest first.
    fn notes_by_owner(
        &self,
        owner_id: UserId,
        limit: i64,
        offset: i64,
    ) -> impl Future<Output = StoreResult<Vec<Note>>> + Send;

    /// Update title and content of the note only if `owner_id` owns it.
    /// Returns `None` when no row matched. Refreshes `updated_at`.
    fn update_owned_note(
        &self,
        id: NoteId,
        owner_id: UserId,
        note: &NewNote,
    ) -> impl Future<Output = StoreResult<Option<Note>>> + Send;

    /// Delete the note only if `owner_id` owns it. Returns whether a row was removed.
    fn delete_owned_note(
        &self,
        id: NoteId,
        owner_id: UserId,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Return the tag named `name`, creating it if absent.
    fn upsert_tag(&self, name: &str) -> impl Future<Output = StoreResult<Tag>> + Send;

    /// Link a tag to a note. Linking an existing pair is a no-op.
    fn link_tag(
        &self,
        note_id: NoteId,
        tag_id: TagId,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn tags_for_note(&self, note_id: NoteId) -> impl Future<Output = StoreResult<Vec<Tag>>> + Send;

    /// All notes, across owners, linked to the tag named `name`.
    fn notes_with_tag(&self, name: &str) -> impl Future<Output = StoreResult<Vec<Note>>> + Send;

    /// Record a read grant. Granting an existing pair is a no-op.
    fn grant_access(&self, access: NoteAccess) -> impl Future<Output = StoreResult<()>> + Send;

    /// Notes for which `user_id` holds a grant.
    fn notes_shared_with(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = StoreResult<Vec<Note>>> + Send;
}
