//! # API crate — ownership, sharing and identity for the notes service
//!
//! Everything the HTTP layer calls lives here, expressed as plain async methods
//! over already-parsed ids and bodies. No wire format concerns.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Argon2id password hashing, HS256 session tokens and their configuration |
//! | [`access`] | — | Who may read, update, delete, tag or share a note |
//! | [`tags`] | — | Tag name normalization and idempotent linking |
//! | [`users`] | — | Registration, login, profiles |
//! | [`notes`] | — | Note CRUD, tagging, sharing and the listings built on them |
//! | [`db`] | `postgres` | PostgreSQL connection pool, migrations and the [`store::Store`] implementation |
//! | [`error`] | — | The error kinds every operation returns |

pub mod access;
pub mod auth;
#[cfg(feature = "postgres")]
pub mod db;
pub mod error;
pub mod notes;
pub mod tags;
pub mod users;

pub use error::{Error, Result};
pub use notes::{NoteService, Page};
pub use users::UserService;
