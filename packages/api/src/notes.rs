//! # Notes and sharing
//!
//! [`NoteService`] composes the access rules in [`crate::access`], the tag
//! normalizer in [`crate::tags`] and a [`Store`] into the note operations.
//!
//! ## Ordering
//!
//! - Input validation runs first and never touches storage.
//! - Updates and deletes are single owner-guarded statements. Only when such a
//!   statement matches nothing is the note re-read, to tell a missing note
//!   (`NotFound`) apart from someone else's (`Forbidden`).
//! - Tagging and sharing authorize against the fetched owner, then insert link or
//!   grant rows. Ownership never changes after creation, and those rows reference
//!   the note by foreign key, so a concurrent delete surfaces as `NotFound`.
//!
//! Grant holders can read shared notes only through [`NoteService::list_shared`];
//! every by-id operation stays owner-only.

use std::sync::Arc;

use store::{NewNote, Note, NoteAccess, NoteId, Store, Tag, UserId};

use crate::access::{authorize, denial, Operation};
use crate::error::{Error, Result};
use crate::tags;

/// Longest title the schema accepts.
pub const MAX_TITLE_LEN: usize = 255;

/// A window into an owner's notes, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Page {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    /// Absent or non-positive values fall back to the defaults.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(Self::DEFAULT_PAGE),
            page_size: page_size
                .filter(|s| *s > 0)
                .unwrap_or(Self::DEFAULT_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

pub struct NoteService<S> {
    store: Arc<S>,
}

impl<S: Store> NoteService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner_id: UserId, note: NewNote) -> Result<Note> {
        validate(&note)?;
        let note = self.store.insert_note(owner_id, &note).await?;
        tracing::debug!(note_id = note.id, owner_id, "created note");
        Ok(note)
    }

    /// The owner's notes for one page, each with its tags.
    pub async fn list(&self, owner_id: UserId, page: Page) -> Result<Vec<Note>> {
        let notes = self
            .store
            .notes_by_owner(owner_id, page.limit(), page.offset())
            .await?;
        let mut enriched = Vec::with_capacity(notes.len());
        for note in notes {
            enriched.push(self.with_tags(note).await?);
        }
        Ok(enriched)
    }

    /// Fetch a note by id. Owner-only.
    pub async fn get(&self, note_id: NoteId, actor: UserId) -> Result<Note> {
        let note = self.store.note_by_id(note_id).await?;
        authorize(Operation::Read, note.as_ref().map(|n| n.owner_id), actor)
            .inspect_err(|e| tracing::debug!(note_id, actor, error = %e, "read denied"))?;
        match note {
            Some(note) => self.with_tags(note).await,
            None => Err(Error::NotFound("note")),
        }
    }

    /// Replace title and content. Owner-only.
    pub async fn update(&self, note_id: NoteId, note: NewNote, actor: UserId) -> Result<Note> {
        validate(&note)?;
        match self.store.update_owned_note(note_id, actor, &note).await? {
            Some(updated) => self.with_tags(updated).await,
            None => Err(self.explain_miss(Operation::Update, note_id, actor).await),
        }
    }

    /// Delete a note; its tag links and grants go with it. Owner-only.
    pub async fn delete(&self, note_id: NoteId, actor: UserId) -> Result<()> {
        if self.store.delete_owned_note(note_id, actor).await? {
            tracing::debug!(note_id, actor, "deleted note");
            Ok(())
        } else {
            Err(self.explain_miss(Operation::Delete, note_id, actor).await)
        }
    }

    /// Attach tags by name and return the note's full tag set. Owner-only.
    pub async fn add_tags<I, T>(&self, note_id: NoteId, names: I, actor: UserId) -> Result<Vec<Tag>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let names = tags::normalize(names)?;
        self.authorize_existing(Operation::Tag, note_id, actor)
            .await?;
        tags::attach(self.store.as_ref(), note_id, &names).await
    }

    /// Every note, across owners, carrying the tag `name`.
    pub async fn list_by_tag(&self, name: &str) -> Result<Vec<Note>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("tag is required"));
        }
        let notes = self.store.notes_with_tag(name).await?;
        if notes.is_empty() {
            return Err(Error::TagNotFound);
        }
        Ok(notes)
    }

    /// Grant `target` read access to a note owned by `owner_id`.
    pub async fn share(&self, note_id: NoteId, owner_id: UserId, target: UserId) -> Result<()> {
        self.authorize_existing(Operation::Share { target }, note_id, owner_id)
            .await?;
        if self.store.user_by_id(target).await?.is_none() {
            return Err(Error::NotFound("user"));
        }
        self.store
            .grant_access(NoteAccess {
                note_id,
                user_id: target,
            })
            .await?;
        tracing::info!(note_id, owner_id, target, "shared note");
        Ok(())
    }

    /// Notes other users have shared with `actor`.
    pub async fn list_shared(&self, actor: UserId) -> Result<Vec<Note>> {
        Ok(self.store.notes_shared_with(actor).await?)
    }

    async fn authorize_existing(&self, op: Operation, note_id: NoteId, actor: UserId) -> Result<()> {
        let owner = self.store.note_by_id(note_id).await?.map(|n| n.owner_id);
        authorize(op, owner, actor).inspect_err(|e| {
            tracing::warn!(note_id, actor, ?op, error = %e, "note operation denied")
        })
    }

    async fn explain_miss(&self, op: Operation, note_id: NoteId, actor: UserId) -> Error {
        let owner = match self.store.note_by_id(note_id).await {
            Ok(note) => note.map(|n| n.owner_id),
            Err(e) => return e.into(),
        };
        let err = denial(op, owner, actor);
        tracing::warn!(note_id, actor, ?op, error = %err, "note operation denied");
        err
    }

    async fn with_tags(&self, mut note: Note) -> Result<Note> {
        note.tags = self.store.tags_for_note(note.id).await?;
        Ok(note)
    }
}

fn validate(note: &NewNote) -> Result<()> {
    if note.title.trim().is_empty() {
        return Err(Error::validation("title is required"));
    }
    if note.content.trim().is_empty() {
        return Err(Error::validation("content is required"));
    }
    if note.title.contains('\0') || note.content.contains('\0') {
        return Err(Error::validation("title and content must not contain NUL"));
    }
    if note.title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{MemoryStore, User};

    struct Fixture {
        store: Arc<MemoryStore>,
        notes: NoteService<MemoryStore>,
        alice: User,
        bob: User,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice", "hash").await.unwrap();
        let bob = store.insert_user("bob", "hash").await.unwrap();
        Fixture {
            notes: NoteService::new(store.clone()),
            store,
            alice,
            bob,
        }
    }

    impl Fixture {
        async fn note(&self, owner: &User, title: &str) -> Note {
            self.notes
                .create(owner.id, NewNote::new(title, "content"))
                .await
                .unwrap()
        }
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(Page::new(None, None), Page { page: 1, page_size: 10 });
        assert_eq!(Page::new(Some(0), Some(-3)), Page { page: 1, page_size: 10 });
        let page = Page::new(Some(3), Some(5));
        assert_eq!((page.limit(), page.offset()), (5, 10));
    }

    #[tokio::test]
    async fn test_create_requires_title_and_content() {
        let f = fixture().await;
        for draft in [NewNote::new("", "c"), NewNote::new("t", "  "), NewNote::default()] {
            assert!(matches!(
                f.notes.create(f.alice.id, draft).await,
                Err(Error::Validation(_))
            ));
        }
        let long = NewNote::new("x".repeat(MAX_TITLE_LEN + 1), "c");
        assert!(matches!(
            f.notes.create(f.alice.id, long).await,
            Err(Error::Validation(_))
        ));
        for draft in [NewNote::new("t\0", "c"), NewNote::new("t", "c\0c")] {
            assert!(matches!(
                f.notes.create(f.alice.id, draft).await,
                Err(Error::Validation(_))
            ));
        }
        assert!(f.notes.list(f.alice.id, Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_owner() {
        let f = fixture().await;
        let note = f.note(&f.alice, "groceries").await;
        assert_eq!(note.owner_id, f.alice.id);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[tokio::test]
    async fn test_get_is_owner_only() {
        let f = fixture().await;
        let note = f.note(&f.alice, "private").await;

        assert_eq!(f.notes.get(note.id, f.alice.id).await.unwrap().id, note.id);
        assert!(matches!(
            f.notes.get(note.id, f.bob.id).await,
            Err(Error::NotFound("note"))
        ));
        assert!(matches!(
            f.notes.get(9999, f.alice.id).await,
            Err(Error::NotFound("note"))
        ));
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let f = fixture().await;
        for i in 1..=12 {
            f.note(&f.alice, &format!("note {i}")).await;
        }
        f.note(&f.bob, "not alice's").await;

        let second = f
            .notes
            .list(f.alice.id, Page::new(Some(2), Some(5)))
            .await
            .unwrap();
        let titles: Vec<_> = second.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["note 7", "note 6", "note 5", "note 4", "note 3"]);

        let first = f.notes.list(f.alice.id, Page::default()).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].title, "note 12");

        let beyond = f
            .notes
            .list(f.alice.id, Page::new(Some(9), Some(5)))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_list_includes_tags() {
        let f = fixture().await;
        let note = f.note(&f.alice, "tagged").await;
        f.notes.add_tags(note.id, ["work"], f.alice.id).await.unwrap();

        let listed = f.notes.list(f.alice.id, Page::default()).await.unwrap();
        assert_eq!(listed[0].tags.len(), 1);
        assert_eq!(listed[0].tags[0].name, "work");
    }

    #[tokio::test]
    async fn test_update_by_owner() {
        let f = fixture().await;
        let note = f.note(&f.alice, "draft").await;
        f.notes.add_tags(note.id, ["keep"], f.alice.id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = f
            .notes
            .update(note.id, NewNote::new("final", "done"), f.alice.id)
            .await
            .unwrap();
        assert_eq!(updated.title, "final");
        assert_eq!(updated.content, "done");
        assert_eq!(updated.owner_id, f.alice.id);
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
        assert_eq!(updated.tags[0].name, "keep");
    }

    #[tokio::test]
    async fn test_update_by_other_is_forbidden_and_unchanged() {
        let f = fixture().await;
        let note = f.note(&f.alice, "mine").await;

        assert!(matches!(
            f.notes
                .update(note.id, NewNote::new("hijack", "x"), f.bob.id)
                .await,
            Err(Error::Forbidden)
        ));
        assert!(matches!(
            f.notes
                .update(4040, NewNote::new("t", "c"), f.bob.id)
                .await,
            Err(Error::NotFound("note"))
        ));
        let stored = f.store.note_by_id(note.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "mine");
    }

    #[tokio::test]
    async fn test_delete_is_owner_only() {
        let f = fixture().await;
        let note = f.note(&f.alice, "doomed").await;

        assert!(matches!(
            f.notes.delete(note.id, f.bob.id).await,
            Err(Error::Forbidden)
        ));
        f.notes.delete(note.id, f.alice.id).await.unwrap();
        assert!(matches!(
            f.notes.delete(note.id, f.alice.id).await,
            Err(Error::NotFound("note"))
        ));
    }

    #[tokio::test]
    async fn test_add_tags_is_idempotent_and_owner_only() {
        let f = fixture().await;
        let note = f.note(&f.alice, "tags").await;

        f.notes.add_tags(note.id, ["rust"], f.alice.id).await.unwrap();
        let tags = f
            .notes
            .add_tags(note.id, ["rust", " rust "], f.alice.id)
            .await
            .unwrap();
        assert_eq!(tags.len(), 1);

        assert!(matches!(
            f.notes.add_tags(note.id, ["spam"], f.bob.id).await,
            Err(Error::Forbidden)
        ));
        assert!(matches!(
            f.notes.add_tags(note.id, [""], f.alice.id).await,
            Err(Error::Validation(_))
        ));

        // An empty request just reports the current set
        let current = f
            .notes
            .add_tags(note.id, Vec::<String>::new(), f.alice.id)
            .await
            .unwrap();
        assert_eq!(current, tags);
    }

    #[tokio::test]
    async fn test_list_by_tag_spans_owners() {
        let f = fixture().await;
        let a = f.note(&f.alice, "a").await;
        let b = f.note(&f.bob, "b").await;
        f.notes.add_tags(a.id, ["shared-topic"], f.alice.id).await.unwrap();
        f.notes.add_tags(b.id, ["shared-topic"], f.bob.id).await.unwrap();

        let notes = f.notes.list_by_tag("shared-topic").await.unwrap();
        let mut ids: Vec<_> = notes.iter().map(|n| n.id).collect();
        ids.sort();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_list_by_unused_tag() {
        let f = fixture().await;
        assert!(matches!(
            f.notes.list_by_tag("nothing").await,
            Err(Error::TagNotFound)
        ));
        assert!(matches!(
            f.notes.list_by_tag("  ").await,
            Err(Error::Validation(_))
        ));

        // A tag whose only note was deleted behaves the same
        let note = f.note(&f.alice, "gone").await;
        f.notes.add_tags(note.id, ["orphan"], f.alice.id).await.unwrap();
        f.notes.delete(note.id, f.alice.id).await.unwrap();
        assert!(matches!(
            f.notes.list_by_tag("orphan").await,
            Err(Error::TagNotFound)
        ));
    }

    #[tokio::test]
    async fn test_share_makes_note_visible_in_shared_list_only() {
        let f = fixture().await;
        let note = f.note(&f.alice, "for bob").await;

        f.notes.share(note.id, f.alice.id, f.bob.id).await.unwrap();

        let shared = f.notes.list_shared(f.bob.id).await.unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].id, note.id);

        // Still no direct access, and no write access
        assert!(matches!(
            f.notes.get(note.id, f.bob.id).await,
            Err(Error::NotFound("note"))
        ));
        assert!(matches!(
            f.notes
                .update(note.id, NewNote::new("edit", "x"), f.bob.id)
                .await,
            Err(Error::Forbidden)
        ));
        assert!(matches!(
            f.notes.delete(note.id, f.bob.id).await,
            Err(Error::Forbidden)
        ));
        assert!(matches!(
            f.notes.add_tags(note.id, ["x"], f.bob.id).await,
            Err(Error::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_share_twice_is_idempotent() {
        let f = fixture().await;
        let note = f.note(&f.alice, "again").await;
        f.notes.share(note.id, f.alice.id, f.bob.id).await.unwrap();
        f.notes.share(note.id, f.alice.id, f.bob.id).await.unwrap();
        assert_eq!(f.notes.list_shared(f.bob.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_self_share_rejected() {
        let f = fixture().await;
        let note = f.note(&f.alice, "mine").await;
        assert!(matches!(
            f.notes.share(note.id, f.alice.id, f.alice.id).await,
            Err(Error::SelfShare)
        ));
        assert!(f.notes.list_shared(f.alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grant_holder_cannot_reshare() {
        let f = fixture().await;
        let carol = f.store.insert_user("carol", "hash").await.unwrap();
        let note = f.note(&f.alice, "chain").await;
        f.notes.share(note.id, f.alice.id, f.bob.id).await.unwrap();

        assert!(matches!(
            f.notes.share(note.id, f.bob.id, carol.id).await,
            Err(Error::Forbidden)
        ));
        assert!(f.notes.list_shared(carol.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_share_with_unknown_user_or_note() {
        let f = fixture().await;
        let note = f.note(&f.alice, "x").await;
        assert!(matches!(
            f.notes.share(note.id, f.alice.id, 777).await,
            Err(Error::NotFound("user"))
        ));
        assert!(matches!(
            f.notes.share(777, f.alice.id, f.bob.id).await,
            Err(Error::NotFound("note"))
        ));
    }

    #[tokio::test]
    async fn test_delete_revokes_shared_visibility() {
        let f = fixture().await;
        let note = f.note(&f.alice, "temporary").await;
        f.notes.share(note.id, f.alice.id, f.bob.id).await.unwrap();
        f.notes.delete(note.id, f.alice.id).await.unwrap();
        assert!(f.notes.list_shared(f.bob.id).await.unwrap().is_empty());
    }
}
