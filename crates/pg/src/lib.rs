//! PostgreSQL integration for cardbox.
//!
//! Connectivity and DDL generation for the flashcard tables. All SQL that
//! names a table goes through the constants below so statements can be
//! assembled at compile time via [`const_format::concatcp!`].
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes the shared read/write connection from `DB_URL`
//! - [`Writer`] — Dedicated connection for multi-statement transactions
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation
//! - [`prepare()`] — Creates one entity's table and indices
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection.
///
/// Connects to PostgreSQL using the `DB_URL` environment variable.
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
///
/// # Panics
///
/// Panics if `DB_URL` is not set or if connection fails.
pub async fn db() -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// Dedicated connection for multi-statement transactions.
///
/// The shared [`db()`] client pipelines statements from concurrent requests
/// over one connection, so an explicit `BEGIN`/`COMMIT` there could absorb
/// unrelated statements. Transactional writes instead take this connection
/// under an async mutex, one transaction at a time.
pub struct Writer {
    client: tokio::sync::Mutex<Client>,
}

impl Writer {
    /// Opens the writer connection from `DB_URL`.
    ///
    /// # Panics
    ///
    /// Panics if `DB_URL` is not set or if connection fails.
    pub async fn connect() -> Self {
        log::info!("connecting writer");
        let tls = tokio_postgres::tls::NoTls;
        let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
        let (client, connection) = tokio_postgres::connect(url, tls)
            .await
            .expect("writer connection failed");
        tokio::spawn(connection);
        Self {
            client: tokio::sync::Mutex::new(client),
        }
    }
    /// Takes exclusive use of the connection. Callers open a transaction on
    /// the guard and must commit or drop it before the guard is released.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Client> {
        self.client.lock().await
    }
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Creates one entity's table and indices if they do not exist.
pub async fn prepare<S: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("preparing table ({})", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await
}

/// Table for registered accounts.
#[rustfmt::skip]
pub const ACCOUNTS: &str = "accounts";
/// Table for decks.
#[rustfmt::skip]
pub const DECKS:    &str = "decks";
/// Table for 1:1 deck descriptions.
#[rustfmt::skip]
pub const BLURBS:   &str = "blurbs";
/// Table for deck cards.
#[rustfmt::skip]
pub const CARDS:    &str = "cards";
/// Table for per-card feedback events.
#[rustfmt::skip]
pub const STATS:    &str = "stats";
