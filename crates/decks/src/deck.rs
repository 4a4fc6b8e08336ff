use cardbox_auth::Account;
use cardbox_core::ID;
use cardbox_core::Unique;

/// Named collection of cards owned by one account.
///
/// Deck names are unique per owner. The public flag is the single input to
/// the visibility policy besides ownership.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Deck {
    id: ID<Self>,
    name: String,
    color: String,
    public: bool,
    owner: ID<Account>,
}

impl Deck {
    pub fn new(
        id: ID<Self>,
        name: String,
        color: String,
        public: bool,
        owner: ID<Account>,
    ) -> Self {
        Self {
            id,
            name,
            color,
            public,
            owner,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn color(&self) -> &str {
        &self.color
    }
    pub fn public(&self) -> bool {
        self.public
    }
    pub fn owner(&self) -> ID<Account> {
        self.owner
    }
}

impl Unique for Deck {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use cardbox_pg::*;

    impl Schema for Deck {
        fn name() -> &'static str {
            DECKS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                DECKS,
                " (
                    id          UUID PRIMARY KEY,
                    name        VARCHAR(16) NOT NULL,
                    color       CHAR(7) NOT NULL,
                    public      BOOLEAN NOT NULL DEFAULT FALSE,
                    owner_id    UUID NOT NULL REFERENCES ",
                ACCOUNTS,
                "(id) ON DELETE CASCADE,
                    UNIQUE (owner_id, name)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_decks_owner ON ",
                DECKS,
                " (owner_id);
                 CREATE INDEX IF NOT EXISTS idx_decks_public ON ",
                DECKS,
                " (owner_id) WHERE public;"
            )
        }
    }
}
