use super::*;
use cardbox_core::ACCOUNT_VERIFICATION_QUEUE_LIMIT;
use cardbox_core::ID;
use cardbox_core::Unique;
use cardbox_pg::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Outcome of an atomic signup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signup {
    Created,
    QueueFull,
}

/// Outcome of presenting a verification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Unknown,
    Verified,
    Already,
}

/// Repository trait for account database operations.
/// Abstracts SQL from domain modules.
#[allow(async_fn_in_trait)]
pub trait AccountRepository {
    async fn email_taken(&self, email: &str) -> Result<bool, PgErr>;
    async fn username_taken(&self, username: &str) -> Result<bool, PgErr>;
    /// Inserts the account unless the pending-verification queue is full.
    /// The count and the insert happen in one statement so concurrent
    /// signups cannot overshoot the queue limit.
    async fn signup(&self, account: &Account, hashword: &str, code: &str)
    -> Result<Signup, PgErr>;
    /// Consumes a verification code. Flips the account to verified exactly
    /// once; presenting the code again reports [`Verification::Already`].
    async fn verify(&self, code: &str) -> Result<Verification, PgErr>;
    async fn lookup(&self, username: &str) -> Result<Option<(Account, String)>, PgErr>;
    async fn account(&self, id: ID<Account>) -> Result<Option<Account>, PgErr>;
    async fn find(&self, username: &str) -> Result<Option<Account>, PgErr>;
}

/// Whether an error is a unique-constraint violation, i.e. a username or
/// email collision that slipped past the pre-insert existence checks.
pub fn collided(e: &PgErr) -> bool {
    e.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION)
}

fn row_account(row: &tokio_postgres::Row) -> Account {
    Account::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, bool>(3),
    )
}

impl AccountRepository for Arc<Client> {
    async fn email_taken(&self, email: &str) -> Result<bool, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", ACCOUNTS, " WHERE email = $1"),
            &[&email],
        )
        .await
        .map(|opt| opt.is_some())
    }

    async fn username_taken(&self, username: &str) -> Result<bool, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", ACCOUNTS, " WHERE username = $1"),
            &[&username],
        )
        .await
        .map(|opt| opt.is_some())
    }

    async fn signup(
        &self,
        account: &Account,
        hashword: &str,
        code: &str,
    ) -> Result<Signup, PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                ACCOUNTS,
                " (id, username, email, hashword, code)
                 SELECT $1, $2, $3, $4, $5
                 WHERE (SELECT COUNT(*) FROM ",
                ACCOUNTS,
                " WHERE NOT verified) < ",
                ACCOUNT_VERIFICATION_QUEUE_LIMIT
            ),
            &[
                &account.id().inner(),
                &account.username(),
                &account.email(),
                &hashword,
                &code,
            ],
        )
        .await
        .map(|rows| match rows {
            0 => Signup::QueueFull,
            _ => Signup::Created,
        })
    }

    async fn verify(&self, code: &str) -> Result<Verification, PgErr> {
        let row = self
            .query_opt(
                const_format::concatcp!("SELECT verified FROM ", ACCOUNTS, " WHERE code = $1"),
                &[&code],
            )
            .await?;
        match row {
            None => Ok(Verification::Unknown),
            Some(row) if row.get::<_, bool>(0) => Ok(Verification::Already),
            Some(_) => self
                .execute(
                    const_format::concatcp!(
                        "UPDATE ",
                        ACCOUNTS,
                        " SET verified = TRUE WHERE code = $1"
                    ),
                    &[&code],
                )
                .await
                .map(|_| Verification::Verified),
        }
    }

    async fn lookup(&self, username: &str) -> Result<Option<(Account, String)>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, username, email, verified, hashword FROM ",
                ACCOUNTS,
                " WHERE username = $1"
            ),
            &[&username],
        )
        .await
        .map(|opt| opt.map(|row| (row_account(&row), row.get::<_, String>(4))))
    }

    async fn account(&self, id: ID<Account>) -> Result<Option<Account>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, username, email, verified FROM ",
                ACCOUNTS,
                " WHERE id = $1"
            ),
            &[&id.inner()],
        )
        .await
        .map(|opt| opt.map(|row| row_account(&row)))
    }

    async fn find(&self, username: &str) -> Result<Option<Account>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, username, email, verified FROM ",
                ACCOUNTS,
                " WHERE username = $1"
            ),
            &[&username],
        )
        .await
        .map(|opt| opt.map(|row| row_account(&row)))
    }
}
