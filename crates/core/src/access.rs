//! State-free access-control rules for journal entries.
//!
//! Evaluated per request against the stored entry's ownership and
//! visibility. Denials are `Forbidden`, kept distinct from not-found so a
//! caller can tell an access problem apart from a missing entry.

use crate::error::CoreError;
use crate::types::UserId;

/// Ownership and visibility of a stored entry, as needed by the rules.
#[derive(Debug, Clone, Copy)]
pub struct EntryAccess {
    pub author_id: UserId,
    pub is_public: bool,
}

/// Whether `requester` may read the entry: public entries are readable by
/// anyone (including anonymous requests); private entries only by the owner.
pub fn can_read(entry: EntryAccess, requester: Option<UserId>) -> bool {
    entry.is_public || requester == Some(entry.author_id)
}

/// Whether `requester` may mutate or delete the entry: owner only, even when
/// the entry is public.
pub fn can_modify(entry: EntryAccess, requester: UserId) -> bool {
    requester == entry.author_id
}

/// Check read access, mapping denial to `Forbidden`.
pub fn ensure_read(entry: EntryAccess, requester: Option<UserId>) -> Result<(), CoreError> {
    if can_read(entry, requester) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("This entry is private".into()))
    }
}

/// Check write access, mapping denial to `Forbidden`.
pub fn ensure_modify(entry: EntryAccess, requester: UserId) -> Result<(), CoreError> {
    if can_modify(entry, requester) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the entry author may modify it".into(),
        ))
    }
}
