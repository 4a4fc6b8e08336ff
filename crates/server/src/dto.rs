//! Request and response shapes.
//!
//! Every inbound payload is deserialized into one of these types and checked
//! eagerly — a request that fails validation never reaches the store. The
//! checks mirror the column widths, so the database never truncates.
use super::envelope::Code;
use cardbox_auth::Account;
use cardbox_core::CARD_TEXT_MAX;
use cardbox_core::DECK_CARD_LIMIT;
use cardbox_core::DECK_COLOR_LENGTH;
use cardbox_core::DECK_DESCRIPTION_MAX;
use cardbox_core::DECK_NAME_MAX;
use cardbox_core::SIGNUP_FIELD_MAX;
use cardbox_core::Unique;
use cardbox_decks::Card;
use cardbox_decks::Deck;
use cardbox_decks::Stat;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), Code> {
        let fields = [&self.username, &self.email, &self.password];
        if fields.iter().any(|f| f.is_empty() || f.len() > SIGNUP_FIELD_MAX) {
            return Err(Code::Validation);
        }
        if !email_wellformed(&self.email) {
            return Err(Code::Validation);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub code: String,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub username: String,
}

#[derive(Deserialize)]
pub struct DeckQuery {
    pub username: String,
    pub deckname: String,
}

#[derive(Deserialize)]
pub struct PullQuery {
    pub deck_owner_username: String,
    pub deckname: String,
}

#[derive(Deserialize)]
pub struct RemoveRequest {
    pub username: String,
    pub deckname: String,
}

#[derive(Deserialize)]
pub struct CreateRequest {
    pub username: String,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub deck_owner_username: String,
    pub deckname: String,
    pub card_id: uuid::Uuid,
    pub feedback: bool,
}

/// The full editable deck view as the client sends it back.
#[derive(Deserialize)]
pub struct StuffBody {
    pub deck: DeckForm,
    pub cards: Vec<CardForm>,
}

#[derive(Deserialize)]
pub struct DeckForm {
    pub id: uuid::Uuid,
    pub name: String,
    pub color: String,
    pub public: bool,
    pub description: String,
}

#[derive(Deserialize)]
pub struct CardForm {
    pub id: uuid::Uuid,
    pub question: String,
    pub answer: String,
}

impl StuffBody {
    pub fn validate(&self) -> Result<(), Code> {
        if self.deck.name.is_empty() || self.deck.name.len() > DECK_NAME_MAX {
            return Err(Code::Validation);
        }
        if !color_wellformed(&self.deck.color) {
            return Err(Code::Validation);
        }
        if self.deck.description.len() > DECK_DESCRIPTION_MAX {
            return Err(Code::Validation);
        }
        if self.cards.len() > DECK_CARD_LIMIT {
            return Err(Code::TooMuchData);
        }
        if self
            .cards
            .iter()
            .any(|c| c.question.len() > CARD_TEXT_MAX || c.answer.len() > CARD_TEXT_MAX)
        {
            return Err(Code::Validation);
        }
        Ok(())
    }
}

/// Just enough of an email shape check to catch obvious mistakes; real
/// assurance comes from the verification mail round trip.
pub fn email_wellformed(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.ends_with('.')
                && email.chars().all(|c| !c.is_whitespace())
        }
        None => false,
    }
}

/// Deck colors are "#rrggbb".
pub fn color_wellformed(color: &str) -> bool {
    color.len() == DECK_COLOR_LENGTH
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Serialize)]
pub struct UserDto {
    pub username: String,
    pub email: String,
    pub verified: bool,
}

impl From<&Account> for UserDto {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username().to_string(),
            email: account.email().to_string(),
            verified: account.verified(),
        }
    }
}

/// Deck summary for listings.
#[derive(Serialize)]
pub struct DeckDto {
    pub name: String,
    pub color: String,
    pub public: bool,
    pub cards: i64,
}

impl From<&(Deck, i64)> for DeckDto {
    fn from((deck, cards): &(Deck, i64)) -> Self {
        Self {
            name: deck.name().to_string(),
            color: deck.color().to_string(),
            public: deck.public(),
            cards: *cards,
        }
    }
}

/// Deck metadata plus description, for the info view.
#[derive(Serialize)]
pub struct DeckInfoDto {
    pub name: String,
    pub color: String,
    pub public: bool,
    pub cards: i64,
    pub description: String,
}

/// The full editable deck view as the server returns it.
#[derive(Serialize)]
pub struct DeckFormDto {
    pub id: uuid::Uuid,
    pub name: String,
    pub color: String,
    pub public: bool,
    pub description: String,
}

impl DeckFormDto {
    pub fn of(deck: &Deck, description: String) -> Self {
        Self {
            id: deck.id().inner(),
            name: deck.name().to_string(),
            color: deck.color().to_string(),
            public: deck.public(),
            description,
        }
    }
}

#[derive(Serialize)]
pub struct CardDto {
    pub id: uuid::Uuid,
    pub question: String,
    pub answer: String,
}

impl From<&Card> for CardDto {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id().inner(),
            question: card.question().to_string(),
            answer: card.answer().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct StatDto {
    pub card_id: uuid::Uuid,
    pub feedback: bool,
    /// Unix seconds.
    pub at: i64,
}

impl From<&Stat> for StatDto {
    fn from(stat: &Stat) -> Self {
        Self {
            card_id: stat.card().inner(),
            feedback: stat.feedback(),
            at: stat
                .at()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn signup_accepts_ordinary_form() {
        assert!(signup("alice", "a@example.com", "hunter2345").validate().is_ok());
    }

    #[test]
    fn signup_rejects_empty_and_oversized_fields() {
        assert!(signup("", "a@example.com", "hunter2345").validate().is_err());
        assert!(signup(&"a".repeat(21), "a@example.com", "pw").validate().is_err());
        assert!(signup("alice", "a@example.com", &"p".repeat(21)).validate().is_err());
    }

    #[test]
    fn signup_rejects_malformed_email() {
        assert!(signup("alice", "not-an-email", "hunter2345").validate().is_err());
        assert!(signup("alice", "a@nodot", "hunter2345").validate().is_err());
        assert!(signup("alice", "a@dot.", "hunter2345").validate().is_err());
        assert!(signup("alice", "a @b.com", "hunter2345").validate().is_err());
    }

    fn stuff(name: &str, color: &str, description: &str, cards: usize) -> StuffBody {
        StuffBody {
            deck: DeckForm {
                id: uuid::Uuid::now_v7(),
                name: name.to_string(),
                color: color.to_string(),
                public: false,
                description: description.to_string(),
            },
            cards: (0..cards)
                .map(|i| CardForm {
                    id: uuid::Uuid::now_v7(),
                    question: format!("q{}", i),
                    answer: format!("a{}", i),
                })
                .collect(),
        }
    }

    #[test]
    fn stuff_accepts_ordinary_deck() {
        assert!(stuff("spanish", "#a1b2c3", "vocab", 3).validate().is_ok());
    }

    #[test]
    fn stuff_enforces_name_bounds() {
        assert!(stuff("", "#a1b2c3", "", 0).validate().is_err());
        assert!(stuff(&"n".repeat(17), "#a1b2c3", "", 0).validate().is_err());
        assert!(stuff(&"n".repeat(16), "#a1b2c3", "", 0).validate().is_ok());
    }

    #[test]
    fn stuff_enforces_color_shape() {
        assert!(stuff("deck", "red", "", 0).validate().is_err());
        assert!(stuff("deck", "a1b2c3d", "", 0).validate().is_err());
        assert!(stuff("deck", "#a1b2cz", "", 0).validate().is_err());
    }

    #[test]
    fn stuff_enforces_description_cap() {
        assert!(stuff("deck", "#a1b2c3", &"d".repeat(2500), 0).validate().is_ok());
        assert!(stuff("deck", "#a1b2c3", &"d".repeat(2501), 0).validate().is_err());
    }

    #[test]
    fn stuff_card_cap_is_capacity_not_validation() {
        assert_eq!(stuff("deck", "#a1b2c3", "", 100).validate(), Ok(()));
        assert_eq!(
            stuff("deck", "#a1b2c3", "", 101).validate(),
            Err(Code::TooMuchData)
        );
    }

    #[test]
    fn stuff_enforces_card_text_cap() {
        let mut body = stuff("deck", "#a1b2c3", "", 1);
        body.cards[0].question = "q".repeat(201);
        assert_eq!(body.validate(), Err(Code::Validation));
    }
}
