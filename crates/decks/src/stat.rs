use super::*;
use cardbox_auth::Account;
use cardbox_core::ID;
use cardbox_core::Unique;

/// One feedback event: an account got a card right or wrong.
///
/// Append-only; the repository evicts the oldest rows for a
/// (account, card) pair once the retention cap is exceeded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stat {
    id: ID<Self>,
    at: std::time::SystemTime,
    feedback: bool,
    owner: ID<Account>,
    card: ID<Card>,
}

impl Stat {
    pub fn new(
        id: ID<Self>,
        at: std::time::SystemTime,
        feedback: bool,
        owner: ID<Account>,
        card: ID<Card>,
    ) -> Self {
        Self {
            id,
            at,
            feedback,
            owner,
            card,
        }
    }
    /// A feedback event happening right now.
    pub fn fresh(owner: ID<Account>, card: ID<Card>, feedback: bool) -> Self {
        Self::new(
            ID::default(),
            std::time::SystemTime::now(),
            feedback,
            owner,
            card,
        )
    }
    pub fn at(&self) -> std::time::SystemTime {
        self.at
    }
    pub fn feedback(&self) -> bool {
        self.feedback
    }
    pub fn owner(&self) -> ID<Account> {
        self.owner
    }
    pub fn card(&self) -> ID<Card> {
        self.card
    }
}

impl Unique for Stat {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use cardbox_pg::*;

    impl Schema for Stat {
        fn name() -> &'static str {
            STATS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                STATS,
                " (
                    id          UUID PRIMARY KEY,
                    at          TIMESTAMPTZ NOT NULL,
                    feedback    BOOLEAN NOT NULL,
                    owner_id    UUID NOT NULL REFERENCES ",
                ACCOUNTS,
                "(id) ON DELETE CASCADE,
                    card_id     UUID NOT NULL REFERENCES ",
                CARDS,
                "(id) ON DELETE CASCADE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_stats_pair ON ",
                STATS,
                " (owner_id, card_id, at);"
            )
        }
    }
}
