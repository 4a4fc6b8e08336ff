use super::*;
use cardbox_core::ID;
use cardbox_core::Unique;

/// One question/answer pair belonging to exactly one deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Card {
    id: ID<Self>,
    question: String,
    answer: String,
    deck: ID<Deck>,
}

impl Card {
    pub fn new(id: ID<Self>, question: String, answer: String, deck: ID<Deck>) -> Self {
        Self {
            id,
            question,
            answer,
            deck,
        }
    }
    pub fn question(&self) -> &str {
        &self.question
    }
    pub fn answer(&self) -> &str {
        &self.answer
    }
    pub fn deck(&self) -> ID<Deck> {
        self.deck
    }
}

impl Unique for Card {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use cardbox_pg::*;

    impl Schema for Card {
        fn name() -> &'static str {
            CARDS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                CARDS,
                " (
                    id          UUID PRIMARY KEY,
                    question    VARCHAR(200) NOT NULL,
                    answer      VARCHAR(200) NOT NULL,
                    deck_id     UUID NOT NULL REFERENCES ",
                DECKS,
                "(id) ON DELETE CASCADE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_cards_deck ON ",
                CARDS,
                " (deck_id);"
            )
        }
    }
}
