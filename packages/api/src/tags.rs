//! Tag normalization and idempotent linking.
//!
//! Names are trimmed and compared case-sensitively. Creating a tag that exists
//! returns the existing row; linking an already linked pair is a no-op, so
//! re-tagging a note never produces duplicate links.

use store::{NoteId, Store, Tag};

use crate::error::{Error, Result};

/// Longest tag name the schema accepts.
pub const MAX_TAG_LEN: usize = 50;

/// Trim, validate and de-duplicate tag names, keeping first-seen order.
pub fn normalize<I, S>(names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(Error::validation("tag name must not be empty"));
        }
        if name.contains('\0') {
            return Err(Error::validation("tag name must not contain NUL"));
        }
        if name.chars().count() > MAX_TAG_LEN {
            return Err(Error::validation(format!(
                "tag name must be at most {MAX_TAG_LEN} characters"
            )));
        }
        if !out.iter().any(|seen| seen == name) {
            out.push(name.to_string());
        }
    }
    Ok(out)
}

/// Create any missing tags, link them to `note_id` and return the note's
/// full tag set afterwards.
pub async fn attach<S>(store: &S, note_id: NoteId, names: &[String]) -> Result<Vec<Tag>>
where
    S: Store,
{
    for name in names {
        let tag = store.upsert_tag(name).await?;
        store.link_tag(note_id, tag.id).await?;
        tracing::debug!(note_id, tag = %tag.name, "linked tag");
    }
    Ok(store.tags_for_note(note_id).await?)
}
