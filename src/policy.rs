//! Ownership-authorization policy.
//!
//! Ownership is the only access-control model in the system: a post or
//! comment may be mutated solely by the user recorded as its author at
//! creation time. Every mutating handler must go through [`authorize`]
//! rather than comparing ids inline.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `caller` may mutate a resource owned by `owner`.
///
/// Allow iff the owner is recorded and exactly equals the caller identity.
/// An absent owner always denies. Pure and side-effect free.
pub fn authorize(caller: Uuid, owner: Option<Uuid>) -> Decision {
    match owner {
        Some(owner) if owner == caller => Decision::Allow,
        _ => Decision::Deny,
    }
}
