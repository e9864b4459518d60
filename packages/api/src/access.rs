//! # Access control — who may do what to a note
//!
//! Pure decision logic. Callers fetch the note's current owner and hand it in
//! together with the acting user; nothing here touches storage.
//!
//! | Operation | Permitted when | Otherwise |
//! |-----------|----------------|-----------|
//! | [`Operation::Read`] | actor is the owner | [`Error::NotFound`] |
//! | [`Operation::Update`], [`Operation::Delete`], [`Operation::Tag`] | actor is the owner | [`Error::Forbidden`] |
//! | [`Operation::Share`] | actor is the owner and the target is not | [`Error::Forbidden`] / [`Error::SelfShare`] |
//!
//! A missing note is always [`Error::NotFound`]. Direct reads answer `NotFound`
//! for non-owners too, so a by-id lookup does not reveal that a note exists.
//! Grant holders never pass any of these checks: their only read path is the
//! shared-notes listing.

use store::UserId;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
    Tag,
    Share { target: UserId },
}

/// Decide whether `actor` may perform `op` on a note owned by `owner`
/// (`None` when the note does not exist).
pub fn authorize(op: Operation, owner: Option<UserId>, actor: UserId) -> Result<()> {
    let Some(owner) = owner else {
        return Err(Error::NotFound("note"));
    };

    if owner != actor {
        return Err(match op {
            Operation::Read => Error::NotFound("note"),
            _ => Error::Forbidden,
        });
    }

    match op {
        Operation::Share { target } if target == owner => Err(Error::SelfShare),
        _ => Ok(()),
    }
}

/// Explain why an owner-guarded write matched no row, given the note as it
/// is now. A note the actor still owns can only mean it was replaced in
/// between, which is reported as missing.
pub fn denial(op: Operation, owner: Option<UserId>, actor: UserId) -> Error {
    authorize(op, owner, actor)
        .err()
        .unwrap_or(Error::NotFound("note"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: UserId = 1;
    const OTHER: UserId = 2;

    #[test]
    fn test_owner_may_do_everything() {
        for op in [
            Operation::Read,
            Operation::Update,
            Operation::Delete,
            Operation::Tag,
            Operation::Share { target: OTHER },
        ] {
            assert!(authorize(op, Some(OWNER), OWNER).is_ok(), "{op:?}");
        }
    }

    #[test]
    fn test_non_owner_read_looks_missing() {
        assert!(matches!(
            authorize(Operation::Read, Some(OWNER), OTHER),
            Err(Error::NotFound("note"))
        ));
    }

    #[test]
    fn test_non_owner_writes_are_forbidden() {
        for op in [
            Operation::Update,
            Operation::Delete,
            Operation::Tag,
            Operation::Share { target: 3 },
        ] {
            assert!(
                matches!(authorize(op, Some(OWNER), OTHER), Err(Error::Forbidden)),
                "{op:?}"
            );
        }
    }

    #[test]
    fn test_missing_note_is_not_found() {
        assert!(matches!(
            authorize(Operation::Delete, None, OWNER),
            Err(Error::NotFound("note"))
        ));
    }

    #[test]
    fn test_self_share_rejected() {
        assert!(matches!(
            authorize(Operation::Share { target: OWNER }, Some(OWNER), OWNER),
            Err(Error::SelfShare)
        ));
    }

    #[test]
    fn test_grant_holder_cannot_reshare_to_owner() {
        // Ownership is checked before the self-share rule
        assert!(matches!(
            authorize(Operation::Share { target: OWNER }, Some(OWNER), OTHER),
            Err(Error::Forbidden)
        ));
    }

    #[test]
    fn test_denial_after_missed_write() {
        assert!(matches!(
            denial(Operation::Update, None, OWNER),
            Error::NotFound("note")
        ));
        assert!(matches!(
            denial(Operation::Update, Some(OWNER), OTHER),
            Error::Forbidden
        ));
        assert!(matches!(
            denial(Operation::Delete, Some(OWNER), OWNER),
            Error::NotFound("note")
        ));
    }
}
