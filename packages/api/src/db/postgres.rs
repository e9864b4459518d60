use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use store::{
    NewNote, Note, NoteAccess, NoteId, Store, StoreError, StoreResult, Tag, TagId, User, UserId,
};

/// PostgreSQL-backed Store.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct NoteRow {
    id: i64,
    title: String,
    content: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            title: row.title,
            content: row.content,
            owner_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            tags: Vec::new(),
        }
    }
}

#[derive(FromRow)]
struct TagRow {
    id: i64,
    name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            name: row.name,
        }
    }
}

/// Name the row a foreign-key constraint points at, from its default name
/// (e.g. `note_tags_tag_id_fkey`).
fn referenced(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("tag_id") => "tag",
        Some(c) if c.contains("user_id") => "user",
        _ => "note",
    }
}

fn store_error(entity: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(entity),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::MissingReference(referenced(db.constraint()))
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

fn notes(rows: Vec<NoteRow>) -> Vec<Note> {
    rows.into_iter().map(Note::from).collect()
}

impl Store for PgStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("username"))?;
        Ok(row.into())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("user"))?;
        Ok(row.map(User::from))
    }

    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("user"))?;
        Ok(row.map(User::from))
    }

    async fn insert_note(&self, owner_id: UserId, note: &NewNote) -> StoreResult<Note> {
        let row: NoteRow = sqlx::query_as(
            "INSERT INTO notes (title, content, user_id) VALUES ($1, $2, $3)
             RETURNING id, title, content, user_id, created_at, updated_at",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("note"))?;
        Ok(row.into())
    }

    async fn note_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let row: Option<NoteRow> = sqlx::query_as(
            "SELECT id, title, content, user_id, created_at, updated_at FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("note"))?;
        Ok(row.map(Note::from))
    }

    async fn notes_by_owner(
        &self,
        owner_id: UserId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Note>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            "SELECT id, title, content, user_id, created_at, updated_at FROM notes
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("note"))?;
        Ok(notes(rows))
    }

    async fn update_owned_note(
        &self,
        id: NoteId,
        owner_id: UserId,
        note: &NewNote,
    ) -> StoreResult<Option<Note>> {
        // updated_at is refreshed by the notes_touch_updated_at trigger
        let row: Option<NoteRow> = sqlx::query_as(
            "UPDATE notes SET title = $1, content = $2
             WHERE id = $3 AND user_id = $4
             RETURNING id, title, content, user_id, created_at, updated_at",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("note"))?;
        Ok(row.map(Note::from))
    }

    async fn delete_owned_note(&self, id: NoteId, owner_id: UserId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(store_error("note"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_tag(&self, name: &str) -> StoreResult<Tag> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let row: TagRow = sqlx::query_as(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("tag"))?;
        Ok(row.into())
    }

    async fn link_tag(&self, note_id: NoteId, tag_id: TagId) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO note_tags (note_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(note_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await
        .map_err(store_error("note tag"))?;
        Ok(())
    }

    async fn tags_for_note(&self, note_id: NoteId) -> StoreResult<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(
            "SELECT t.id, t.name FROM tags t
             JOIN note_tags nt ON nt.tag_id = t.id
             WHERE nt.note_id = $1
             ORDER BY t.id",
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("tag"))?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn notes_with_tag(&self, name: &str) -> StoreResult<Vec<Note>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            "SELECT n.id, n.title, n.content, n.user_id, n.created_at, n.updated_at
             FROM notes n
             JOIN note_tags nt ON nt.note_id = n.id
             JOIN tags t ON t.id = nt.tag_id
             WHERE t.name = $1
             ORDER BY n.created_at DESC, n.id DESC",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("note"))?;
        Ok(notes(rows))
    }

    async fn grant_access(&self, access: NoteAccess) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO note_access (note_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(access.note_id)
        .bind(access.user_id)
        .execute(&self.pool)
        .await
        .map_err(store_error("grant"))?;
        Ok(())
    }

    async fn notes_shared_with(&self, user_id: UserId) -> StoreResult<Vec<Note>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            "SELECT n.id, n.title, n.content, n.user_id, n.created_at, n.updated_at
             FROM notes n
             JOIN note_access na ON na.note_id = n.id
             WHERE na.user_id = $1
             ORDER BY n.created_at DESC, n.id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("note"))?;
        Ok(notes(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_row_from_constraint_name() {
        assert_eq!(referenced(Some("note_tags_tag_id_fkey")), "tag");
        assert_eq!(referenced(Some("note_access_user_id_fkey")), "user");
        assert_eq!(referenced(Some("notes_user_id_fkey")), "user");
        assert_eq!(referenced(Some("note_tags_note_id_fkey")), "note");
        assert_eq!(referenced(None), "note");
    }
}
