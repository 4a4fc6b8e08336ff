use cardbox_core::ID;
use cardbox_core::Unique;

/// Registered user account.
///
/// Accounts start unverified and flip to verified exactly once, when the
/// emailed code is presented. The verification code and password hash are
/// database-only fields, not part of the domain type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    id: ID<Self>,
    username: String,
    email: String,
    verified: bool,
}

impl Account {
    pub fn new(id: ID<Self>, username: String, email: String, verified: bool) -> Self {
        Self {
            id,
            username,
            email,
            verified,
        }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn verified(&self) -> bool {
        self.verified
    }
}

impl Unique for Account {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use cardbox_pg::*;

    impl Schema for Account {
        fn name() -> &'static str {
            ACCOUNTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ACCOUNTS,
                " (
                    id          UUID PRIMARY KEY,
                    username    VARCHAR(20) UNIQUE NOT NULL,
                    email       VARCHAR(254) UNIQUE NOT NULL,
                    hashword    TEXT NOT NULL,
                    code        CHAR(32) UNIQUE NOT NULL,
                    verified    BOOLEAN NOT NULL DEFAULT FALSE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_accounts_username ON ",
                ACCOUNTS,
                " (username);
                 CREATE INDEX IF NOT EXISTS idx_accounts_code ON ",
                ACCOUNTS,
                " (code);
                 CREATE INDEX IF NOT EXISTS idx_accounts_pending ON ",
                ACCOUNTS,
                " (verified) WHERE NOT verified;"
            )
        }
    }
}
