use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::models::{NewNote, Note, NoteAccess, NoteId, Tag, TagId, User, UserId};
use crate::repo::{Store, StoreError, StoreResult};

/// In-memory Store for testing and local runs.
///
/// Enforces the same constraints as the relational schema: unique usernames
/// and tag names, unique pair relations, foreign keys and cascading deletes.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    last_user_id: UserId,
    last_note_id: NoteId,
    last_tag_id: TagId,
    users: BTreeMap<UserId, User>,
    notes: BTreeMap<NoteId, Note>,
    tags: BTreeMap<TagId, Tag>,
    note_tags: BTreeSet<(NoteId, TagId)>,
    note_access: BTreeSet<(NoteId, UserId)>,
}

impl Tables {
    /// Newest first, ties broken by id so insertion order is stable.
    fn sorted<'a>(notes: impl Iterator<Item = &'a Note>) -> Vec<Note> {
        let mut notes: Vec<Note> = notes.cloned().collect();
        notes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        notes
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Backend(format!("memory store poisoned: {e}")))
    }
}

impl Store for MemoryStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut t = self.tables()?;
        if t.users.values().any(|u| u.username == username) {
            return Err(StoreError::Duplicate("username"));
        }
        t.last_user_id += 1;
        let user = User {
            id: t.last_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.tables()?;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn insert_note(&self, owner_id: UserId, note: &NewNote) -> StoreResult<Note> {
        let mut t = self.tables()?;
        if !t.users.contains_key(&owner_id) {
            return Err(StoreError::MissingReference("user"));
        }
        t.last_note_id += 1;
        let now = Utc::now();
        let note = Note {
            id: t.last_note_id,
            title: note.title.clone(),
            content: note.content.clone(),
            owner_id,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        };
        t.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn note_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        Ok(self.tables()?.notes.get(&id).cloned())
    }

    async fn notes_by_owner(
        &self,
        owner_id: UserId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Note>> {
        let t = self.tables()?;
        let owned = Tables::sorted(t.notes.values().filter(|n| n.owner_id == owner_id));
        Ok(owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update_owned_note(
        &self,
        id: NoteId,
        owner_id: UserId,
        note: &NewNote,
    ) -> StoreResult<Option<Note>> {
        let mut t = self.tables()?;
        let Some(existing) = t.notes.get_mut(&id).filter(|n| n.owner_id == owner_id) else {
            return Ok(None);
        };
        existing.title = note.title.clone();
        existing.content = note.content.clone();
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete_owned_note(&self, id: NoteId, owner_id: UserId) -> StoreResult<bool> {
        let mut t = self.tables()?;
        if !t.notes.get(&id).is_some_and(|n| n.owner_id == owner_id) {
            return Ok(false);
        }
        t.notes.remove(&id);
        t.note_tags.retain(|(note_id, _)| *note_id != id);
        t.note_access.retain(|(note_id, _)| *note_id != id);
        Ok(true)
    }

    async fn upsert_tag(&self, name: &str) -> StoreResult<Tag> {
        let mut t = self.tables()?;
        if let Some(tag) = t.tags.values().find(|tag| tag.name == name) {
            return Ok(tag.clone());
        }
        t.last_tag_id += 1;
        let tag = Tag {
            id: t.last_tag_id,
            name: name.to_string(),
        };
        t.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn link_tag(&self, note_id: NoteId, tag_id: TagId) -> StoreResult<()> {
        let mut t = self.tables()?;
        if !t.notes.contains_key(&note_id) {
            return Err(StoreError::MissingReference("note"));
        }
        if !t.tags.contains_key(&tag_id) {
            return Err(StoreError::MissingReference("tag"));
        }
        t.note_tags.insert((note_id, tag_id));
        Ok(())
    }

    async fn tags_for_note(&self, note_id: NoteId) -> StoreResult<Vec<Tag>> {
        let t = self.tables()?;
        Ok(t.note_tags
            .iter()
            .filter(|(n, _)| *n == note_id)
            .filter_map(|(_, tag_id)| t.tags.get(tag_id).cloned())
            .collect())
    }

    async fn notes_with_tag(&self, name: &str) -> StoreResult<Vec<Note>> {
        let t = self.tables()?;
        let Some(tag_id) = t.tags.values().find(|tag| tag.name == name).map(|tag| tag.id) else {
            return Ok(Vec::new());
        };
        Ok(Tables::sorted(
            t.note_tags
                .iter()
                .filter(|(_, tag)| *tag == tag_id)
                .filter_map(|(note_id, _)| t.notes.get(note_id)),
        ))
    }

    async fn grant_access(&self, access: NoteAccess) -> StoreResult<()> {
        let mut t = self.tables()?;
        if !t.notes.contains_key(&access.note_id) {
            return Err(StoreError::MissingReference("note"));
        }
        if !t.users.contains_key(&access.user_id) {
            return Err(StoreError::MissingReference("user"));
        }
        t.note_access.insert((access.note_id, access.user_id));
        Ok(())
    }

    async fn notes_shared_with(&self, user_id: UserId) -> StoreResult<Vec<Note>> {
        let t = self.tables()?;
        Ok(Tables::sorted(
            t.note_access
                .iter()
                .filter(|(_, user)| *user == user_id)
                .filter_map(|(note_id, _)| t.notes.get(note_id)),
        ))
    }
}
