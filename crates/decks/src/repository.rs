use super::*;
use crate::policy::Scope;
use cardbox_auth::Account;
use cardbox_core::ID;
use cardbox_core::USER_CARD_STAT_LIMIT;
use cardbox_core::USER_DECK_LIMIT;
use cardbox_core::Unique;
use cardbox_pg::*;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Transaction;

/// Newest rows kept per (account, card) pair after a feedback insert.
const RETAINED: usize = USER_CARD_STAT_LIMIT - 1;

fn row_deck(row: &tokio_postgres::Row) -> Deck {
    Deck::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, bool>(3),
        ID::from(row.get::<_, uuid::Uuid>(4)),
    )
}

fn row_card(row: &tokio_postgres::Row) -> Card {
    Card::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        ID::from(row.get::<_, uuid::Uuid>(3)),
    )
}

/// Repository trait for deck, card, and stat reads plus the single-statement
/// writes. Multi-entity writes live on [`DeckEditor`].
#[allow(async_fn_in_trait)]
pub trait DeckRepository {
    /// Decks of one owner with their card counts, filtered by scope.
    async fn decks(&self, owner: ID<Account>, scope: Scope) -> Result<Vec<(Deck, i64)>, PgErr>;
    async fn deck(&self, owner: ID<Account>, name: &str) -> Result<Option<Deck>, PgErr>;
    async fn blurb(&self, deck: ID<Deck>) -> Result<Option<String>, PgErr>;
    async fn cards(&self, deck: ID<Deck>) -> Result<Vec<Card>, PgErr>;
    async fn card(&self, deck: ID<Deck>, id: ID<Card>) -> Result<Option<Card>, PgErr>;
    /// All deck names of one owner, for the free-name search at creation.
    async fn names(&self, owner: ID<Account>) -> Result<Vec<String>, PgErr>;
    /// Deletes a deck; cascades take its description, cards, and their stats.
    async fn remove(&self, deck: ID<Deck>) -> Result<u64, PgErr>;
    /// One account's stats across a deck's cards, oldest first.
    async fn stats(&self, owner: ID<Account>, deck: ID<Deck>) -> Result<Vec<Stat>, PgErr>;
    /// Appends a feedback row and evicts the oldest rows for the
    /// (account, card) pair beyond the retention cap. One data-modifying
    /// statement, so concurrent posts cannot overshoot the cap.
    async fn record(&self, stat: &Stat) -> Result<(), PgErr>;
}

impl DeckRepository for Arc<Client> {
    async fn decks(&self, owner: ID<Account>, scope: Scope) -> Result<Vec<(Deck, i64)>, PgErr> {
        let rows = match scope {
            Scope::Everything => {
                self.query(
                    const_format::concatcp!(
                        "SELECT d.id, d.name, d.color, d.public, d.owner_id,
                                (SELECT COUNT(*) FROM ",
                        CARDS,
                        " c WHERE c.deck_id = d.id)
                         FROM ",
                        DECKS,
                        " d WHERE d.owner_id = $1 ORDER BY d.name"
                    ),
                    &[&owner.inner()],
                )
                .await?
            }
            Scope::PublicOnly => {
                self.query(
                    const_format::concatcp!(
                        "SELECT d.id, d.name, d.color, d.public, d.owner_id,
                                (SELECT COUNT(*) FROM ",
                        CARDS,
                        " c WHERE c.deck_id = d.id)
                         FROM ",
                        DECKS,
                        " d WHERE d.owner_id = $1 AND d.public ORDER BY d.name"
                    ),
                    &[&owner.inner()],
                )
                .await?
            }
        };
        Ok(rows
            .iter()
            .map(|row| (row_deck(row), row.get::<_, i64>(5)))
            .collect())
    }

    async fn deck(&self, owner: ID<Account>, name: &str) -> Result<Option<Deck>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, name, color, public, owner_id FROM ",
                DECKS,
                " WHERE owner_id = $1 AND name = $2"
            ),
            &[&owner.inner(), &name],
        )
        .await
        .map(|opt| opt.map(|row| row_deck(&row)))
    }

    async fn blurb(&self, deck: ID<Deck>) -> Result<Option<String>, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT body FROM ", BLURBS, " WHERE deck_id = $1"),
            &[&deck.inner()],
        )
        .await
        .map(|opt| opt.map(|row| row.get::<_, String>(0)))
    }

    async fn cards(&self, deck: ID<Deck>) -> Result<Vec<Card>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT id, question, answer, deck_id FROM ",
                CARDS,
                " WHERE deck_id = $1 ORDER BY id"
            ),
            &[&deck.inner()],
        )
        .await
        .map(|rows| rows.iter().map(row_card).collect())
    }

    async fn card(&self, deck: ID<Deck>, id: ID<Card>) -> Result<Option<Card>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, question, answer, deck_id FROM ",
                CARDS,
                " WHERE deck_id = $1 AND id = $2"
            ),
            &[&deck.inner(), &id.inner()],
        )
        .await
        .map(|opt| opt.map(|row| row_card(&row)))
    }

    async fn names(&self, owner: ID<Account>) -> Result<Vec<String>, PgErr> {
        self.query(
            const_format::concatcp!("SELECT name FROM ", DECKS, " WHERE owner_id = $1"),
            &[&owner.inner()],
        )
        .await
        .map(|rows| rows.iter().map(|row| row.get::<_, String>(0)).collect())
    }

    async fn remove(&self, deck: ID<Deck>) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", DECKS, " WHERE id = $1"),
            &[&deck.inner()],
        )
        .await
    }

    async fn stats(&self, owner: ID<Account>, deck: ID<Deck>) -> Result<Vec<Stat>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT s.id, s.at, s.feedback, s.owner_id, s.card_id
                 FROM ",
                STATS,
                " s JOIN ",
                CARDS,
                " c ON s.card_id = c.id
                 WHERE s.owner_id = $1 AND c.deck_id = $2
                 ORDER BY s.at"
            ),
            &[&owner.inner(), &deck.inner()],
        )
        .await
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    Stat::new(
                        ID::from(row.get::<_, uuid::Uuid>(0)),
                        row.get::<_, std::time::SystemTime>(1),
                        row.get::<_, bool>(2),
                        ID::from(row.get::<_, uuid::Uuid>(3)),
                        ID::from(row.get::<_, uuid::Uuid>(4)),
                    )
                })
                .collect()
        })
    }

    async fn record(&self, stat: &Stat) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "WITH fresh AS (
                    INSERT INTO ",
                STATS,
                " (id, at, feedback, owner_id, card_id)
                  VALUES ($1, $2, $3, $4, $5)
                 )
                 DELETE FROM ",
                STATS,
                " WHERE id IN (
                    SELECT id FROM ",
                STATS,
                "   WHERE owner_id = $4 AND card_id = $5
                    ORDER BY at DESC, id DESC
                    OFFSET ",
                RETAINED,
                ")"
            ),
            &[
                &stat.id().inner(),
                &stat.at(),
                &stat.feedback(),
                &stat.owner().inner(),
                &stat.card().inner(),
            ],
        )
        .await
        .map(|_| ())
    }
}

/// Multi-entity deck writes, run inside one transaction on the writer
/// connection so a mid-sequence failure cannot leave the deck, its
/// description, and its cards inconsistent.
#[allow(async_fn_in_trait)]
pub trait DeckEditor {
    /// Inserts a deck unless the owner is at the deck cap. The count and
    /// the insert happen in one statement.
    async fn insert_deck(&self, deck: &Deck) -> Result<bool, PgErr>;
    /// Updates deck metadata; false when no such deck belongs to the owner.
    async fn update_deck(&self, deck: &Deck) -> Result<bool, PgErr>;
    async fn set_blurb(&self, deck: ID<Deck>, body: &str) -> Result<(), PgErr>;
    /// Deletes the deck's cards whose ids are not in `keep`.
    async fn prune_cards(&self, deck: ID<Deck>, keep: &[uuid::Uuid]) -> Result<u64, PgErr>;
    /// Updates a card in place if the id belongs to this deck, otherwise
    /// creates a fresh card with the given text.
    async fn upsert_card(
        &self,
        deck: ID<Deck>,
        id: ID<Card>,
        question: &str,
        answer: &str,
    ) -> Result<(), PgErr>;
}

impl DeckEditor for Transaction<'_> {
    async fn insert_deck(&self, deck: &Deck) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                DECKS,
                " (id, name, color, public, owner_id)
                 SELECT $1, $2, $3, $4, $5
                 WHERE (SELECT COUNT(*) FROM ",
                DECKS,
                " WHERE owner_id = $5) < ",
                USER_DECK_LIMIT
            ),
            &[
                &deck.id().inner(),
                &deck.name(),
                &deck.color(),
                &deck.public(),
                &deck.owner().inner(),
            ],
        )
        .await
        .map(|rows| rows > 0)
    }

    async fn update_deck(&self, deck: &Deck) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                DECKS,
                " SET name = $1, color = $2, public = $3
                 WHERE id = $4 AND owner_id = $5"
            ),
            &[
                &deck.name(),
                &deck.color(),
                &deck.public(),
                &deck.id().inner(),
                &deck.owner().inner(),
            ],
        )
        .await
        .map(|rows| rows > 0)
    }

    async fn set_blurb(&self, deck: ID<Deck>, body: &str) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                BLURBS,
                " (deck_id, body) VALUES ($1, $2)
                 ON CONFLICT (deck_id) DO UPDATE SET body = EXCLUDED.body"
            ),
            &[&deck.inner(), &body],
        )
        .await
        .map(|_| ())
    }

    async fn prune_cards(&self, deck: ID<Deck>, keep: &[uuid::Uuid]) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!(
                "DELETE FROM ",
                CARDS,
                " WHERE deck_id = $1 AND NOT (id = ANY($2))"
            ),
            &[&deck.inner(), &keep],
        )
        .await
    }

    async fn upsert_card(
        &self,
        deck: ID<Deck>,
        id: ID<Card>,
        question: &str,
        answer: &str,
    ) -> Result<(), PgErr> {
        let updated = self
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    CARDS,
                    " SET question = $1, answer = $2
                     WHERE id = $3 AND deck_id = $4"
                ),
                &[&question, &answer, &id.inner(), &deck.inner()],
            )
            .await?;
        match updated {
            0 => self
                .execute(
                    const_format::concatcp!(
                        "INSERT INTO ",
                        CARDS,
                        " (id, question, answer, deck_id) VALUES ($1, $2, $3, $4)"
                    ),
                    &[
                        &ID::<Card>::default().inner(),
                        &question,
                        &answer,
                        &deck.inner(),
                    ],
                )
                .await
                .map(|_| ()),
            _ => Ok(()),
        }
    }
}
