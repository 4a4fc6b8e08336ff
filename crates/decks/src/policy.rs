//! Visibility and ownership decisions.
//!
//! Pure functions of (actor, resource owner, public flag) — no I/O, no
//! retries, no state. Handlers call exactly one of these per operation and
//! map the outcome onto the response envelope.
//!
//! Read paths hide private decks from non-owners as not-found, so their
//! existence is never confirmed. Write and administrative paths answer with
//! an explicit access or verification error instead, since the caller
//! already knows its own username. That asymmetry is deliberate and must
//! hold across every operation here.
use cardbox_auth::Actor;

/// How much of a user's deck list an actor may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Everything,
    PublicOnly,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No identity on the request.
    SignIn,
    /// Signed in, but the account has not verified its email.
    Verify,
    /// Signed in as somebody other than the owner, on a path that may say so.
    Denied,
    /// Hidden from this actor; surfaced as not-found.
    Hidden,
}

/// Listing a user's decks. Owners see everything, everyone else (anonymous
/// included) sees public decks only.
pub fn browse(actor: &Actor, owner: &str) -> Scope {
    match actor.is(owner) {
        true => Scope::Everything,
        false => Scope::PublicOnly,
    }
}

/// Reading deck metadata. Public decks are open to anyone; private decks
/// exist only for their owner.
pub fn inspect(actor: &Actor, owner: &str, public: bool) -> Access {
    if public {
        Access::Granted
    } else if actor.is(owner) {
        Access::Granted
    } else {
        Access::Hidden
    }
}

/// Reading one's own stats on a deck. Requires a signed-in actor; the deck
/// must be public or the actor's own.
pub fn review(actor: &Actor, owner: &str, public: bool) -> Access {
    if !actor.signed() {
        Access::SignIn
    } else if public || actor.is(owner) {
        Access::Granted
    } else {
        Access::Hidden
    }
}

/// The full deck editing view: reading deck stuff, upserting it, removing
/// a deck, creating one. Owner only, and the owner must be verified.
pub fn curate(actor: &Actor, owner: &str) -> Access {
    if !actor.signed() {
        Access::SignIn
    } else if !actor.is(owner) {
        Access::Denied
    } else if !actor.verified() {
        Access::Verify
    } else {
        Access::Granted
    }
}

/// Pulling the next card. Requires a signed-in actor; the deck must be
/// public or the actor's own.
pub fn pull(actor: &Actor, owner: &str, public: bool) -> Access {
    if !actor.signed() {
        Access::SignIn
    } else if public || actor.is(owner) {
        Access::Granted
    } else {
        Access::Hidden
    }
}

/// Posting feedback on a card. Requires a signed-in, verified actor; the
/// deck must be public or the actor's own.
pub fn feedback(actor: &Actor, owner: &str, public: bool) -> Access {
    if !actor.signed() {
        Access::SignIn
    } else if !actor.verified() {
        Access::Verify
    } else if public || actor.is(owner) {
        Access::Granted
    } else {
        Access::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardbox_auth::Account;
    use cardbox_core::ID;

    const OWNER: &str = "alice";

    fn anon() -> Actor {
        Actor::Anon
    }
    fn owner() -> Actor {
        Actor::from(Account::new(
            ID::default(),
            OWNER.to_string(),
            "alice@example.com".to_string(),
            true,
        ))
    }
    fn owner_pending() -> Actor {
        Actor::from(Account::new(
            ID::default(),
            OWNER.to_string(),
            "alice@example.com".to_string(),
            false,
        ))
    }
    fn stranger() -> Actor {
        Actor::from(Account::new(
            ID::default(),
            "bob".to_string(),
            "bob@example.com".to_string(),
            true,
        ))
    }
    fn stranger_pending() -> Actor {
        Actor::from(Account::new(
            ID::default(),
            "bob".to_string(),
            "bob@example.com".to_string(),
            false,
        ))
    }

    #[test]
    fn browse_owner_sees_everything() {
        assert_eq!(browse(&owner(), OWNER), Scope::Everything);
        assert_eq!(browse(&owner_pending(), OWNER), Scope::Everything);
    }

    #[test]
    fn browse_others_see_public_only() {
        assert_eq!(browse(&anon(), OWNER), Scope::PublicOnly);
        assert_eq!(browse(&stranger(), OWNER), Scope::PublicOnly);
    }

    #[test]
    fn inspect_public_is_open_to_anyone() {
        assert_eq!(inspect(&anon(), OWNER, true), Access::Granted);
        assert_eq!(inspect(&stranger(), OWNER, true), Access::Granted);
        assert_eq!(inspect(&owner(), OWNER, true), Access::Granted);
    }

    #[test]
    fn inspect_private_exists_only_for_owner() {
        assert_eq!(inspect(&owner(), OWNER, false), Access::Granted);
        assert_eq!(inspect(&owner_pending(), OWNER, false), Access::Granted);
        assert_eq!(inspect(&anon(), OWNER, false), Access::Hidden);
        assert_eq!(inspect(&stranger(), OWNER, false), Access::Hidden);
    }

    #[test]
    fn review_requires_sign_in() {
        assert_eq!(review(&anon(), OWNER, true), Access::SignIn);
        assert_eq!(review(&anon(), OWNER, false), Access::SignIn);
    }

    #[test]
    fn review_follows_visibility() {
        assert_eq!(review(&stranger(), OWNER, true), Access::Granted);
        assert_eq!(review(&stranger(), OWNER, false), Access::Hidden);
        assert_eq!(review(&owner(), OWNER, false), Access::Granted);
    }

    #[test]
    fn review_does_not_require_verification() {
        assert_eq!(review(&stranger_pending(), OWNER, true), Access::Granted);
        assert_eq!(review(&owner_pending(), OWNER, false), Access::Granted);
    }

    #[test]
    fn curate_rejects_anonymous_before_ownership() {
        assert_eq!(curate(&anon(), OWNER), Access::SignIn);
    }

    #[test]
    fn curate_rejects_non_owner_with_denial_not_hidden() {
        assert_eq!(curate(&stranger(), OWNER), Access::Denied);
        assert_eq!(curate(&stranger_pending(), OWNER), Access::Denied);
    }

    #[test]
    fn curate_requires_verified_owner() {
        assert_eq!(curate(&owner_pending(), OWNER), Access::Verify);
        assert_eq!(curate(&owner(), OWNER), Access::Granted);
    }

    #[test]
    fn pull_requires_sign_in() {
        assert_eq!(pull(&anon(), OWNER, true), Access::SignIn);
    }

    #[test]
    fn pull_hides_private_decks_from_non_owners() {
        assert_eq!(pull(&stranger(), OWNER, false), Access::Hidden);
        assert_eq!(pull(&stranger(), OWNER, true), Access::Granted);
        assert_eq!(pull(&owner(), OWNER, false), Access::Granted);
    }

    #[test]
    fn pull_does_not_require_verification() {
        assert_eq!(pull(&stranger_pending(), OWNER, true), Access::Granted);
    }

    #[test]
    fn feedback_requires_sign_in_then_verification() {
        assert_eq!(feedback(&anon(), OWNER, true), Access::SignIn);
        assert_eq!(feedback(&stranger_pending(), OWNER, true), Access::Verify);
        assert_eq!(feedback(&owner_pending(), OWNER, false), Access::Verify);
    }

    #[test]
    fn feedback_follows_visibility_after_verification() {
        assert_eq!(feedback(&stranger(), OWNER, true), Access::Granted);
        assert_eq!(feedback(&stranger(), OWNER, false), Access::Hidden);
        assert_eq!(feedback(&owner(), OWNER, false), Access::Granted);
    }
}
