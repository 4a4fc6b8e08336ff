use super::*;
use cardbox_core::ID;
use cardbox_core::Unique;

/// Actor represents request identity: anonymous or a loaded account.
///
/// The account is re-read from the database per request, so the verified
/// flag is always current rather than frozen into the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Actor {
    Anon,
    Auth(Account),
}

impl Actor {
    pub fn id(&self) -> Option<ID<Account>> {
        match self {
            Self::Auth(account) => Some(account.id()),
            Self::Anon => None,
        }
    }
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Auth(account) => Some(account.username()),
            Self::Anon => None,
        }
    }
    /// Whether this actor is signed in at all.
    pub fn signed(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
    /// Whether this actor has completed email verification.
    pub fn verified(&self) -> bool {
        match self {
            Self::Auth(account) => account.verified(),
            Self::Anon => false,
        }
    }
    /// Whether this actor is the named user.
    pub fn is(&self, username: &str) -> bool {
        self.username() == Some(username)
    }
}

impl From<Account> for Actor {
    fn from(account: Account) -> Self {
        Self::Auth(account)
    }
}

impl From<Option<Account>> for Actor {
    fn from(account: Option<Account>) -> Self {
        account.map(Self::Auth).unwrap_or(Self::Anon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, verified: bool) -> Account {
        Account::new(
            ID::default(),
            username.to_string(),
            format!("{}@example.com", username),
            verified,
        )
    }

    #[test]
    fn anonymous_is_nobody() {
        assert!(!Actor::Anon.signed());
        assert!(!Actor::Anon.verified());
        assert!(!Actor::Anon.is("alice"));
        assert_eq!(Actor::Anon.id(), None);
    }

    #[test]
    fn identity_check_matches_username_only() {
        let actor = Actor::from(account("alice", true));
        assert!(actor.is("alice"));
        assert!(!actor.is("bob"));
    }

    #[test]
    fn verification_tracks_account_flag() {
        assert!(Actor::from(account("alice", true)).verified());
        assert!(!Actor::from(account("alice", false)).verified());
    }
}
