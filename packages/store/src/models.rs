//! # Domain records for users, notes, tags and access grants
//!
//! These are the rows the storage layer hands back to the core. They are
//! `Serialize + Deserialize` so the HTTP layer can return them directly.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A registered account. Carries the password hash, which is never serialized. |
//! | [`UserProfile`] | The client-safe projection of a [`User`] (no hash). |
//! | [`Note`] | A note with its owner, timestamps and (optionally enriched) tag set. |
//! | [`NewNote`] | The fields a caller supplies when creating or updating a note. |
//! | [`Tag`] | A globally unique, case-sensitive tag name. |
//! | [`NoteAccess`] | A read-only grant of one note to one non-owner. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type NoteId = i64;
pub type TagId = i64;

/// Full user record, including the stored credential.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Project to the fields that are safe to return to a client.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// User information safe to send to the client.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A note owned by exactly one user.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Owner, fixed at creation.
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Filled in only by operations that enrich notes with their tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// Title and content supplied for a create or update.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Read-only grant of `note_id` to `user_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteAccess {
    pub note_id: NoteId,
    pub user_id: UserId,
}
