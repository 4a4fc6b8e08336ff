use crate::dto::*;
use crate::envelope::Code;
use crate::envelope::oops;
use actix_web::HttpResponse;
use actix_web::web;
use cardbox_auth::Account;
use cardbox_auth::AccountRepository;
use cardbox_auth::Actor;
use cardbox_auth::collided;
use cardbox_core::ID;
use cardbox_core::Unique;
use cardbox_decks::*;
use cardbox_pg::PgErr;
use cardbox_pg::Writer;
use std::sync::Arc;
use tokio_postgres::Client;

/// Maps a policy denial onto its envelope code. `Granted` has no code; the
/// handler proceeds.
fn denial(access: policy::Access) -> Option<Code> {
    match access {
        policy::Access::Granted => None,
        policy::Access::SignIn => Some(Code::AuthRequired),
        policy::Access::Verify => Some(Code::VerificationRequired),
        policy::Access::Denied => Some(Code::AccessDenied),
        policy::Access::Hidden => Some(Code::DeckNotFound),
    }
}

async fn owner_of(db: &Arc<Client>, username: &str) -> Result<Option<Account>, PgErr> {
    db.find(username).await
}

/// GET /get-decks?username=...
pub async fn get_decks(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    query: web::Query<UserQuery>,
) -> HttpResponse {
    let owner = match owner_of(&db, &query.username).await {
        Ok(Some(owner)) => owner,
        Ok(None) => return Code::UserNotFound.reply(),
        Err(e) => return oops(e),
    };
    let scope = policy::browse(&actor, &query.username);
    match db.decks(owner.id(), scope).await {
        Ok(decks) => Code::Okay.with(serde_json::json!({
            "decks": decks.iter().map(DeckDto::from).collect::<Vec<_>>(),
        })),
        Err(e) => oops(e),
    }
}

/// GET /get-deck-info?username=...&deckname=...
pub async fn get_deck_info(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    query: web::Query<DeckQuery>,
) -> HttpResponse {
    let owner = match owner_of(&db, &query.username).await {
        Ok(Some(owner)) => owner,
        Ok(None) => return Code::UserNotFound.reply(),
        Err(e) => return oops(e),
    };
    let deck = match db.deck(owner.id(), &query.deckname).await {
        Ok(Some(deck)) => deck,
        Ok(None) => return Code::DeckNotFound.reply(),
        Err(e) => return oops(e),
    };
    if let Some(code) = denial(policy::inspect(&actor, &query.username, deck.public())) {
        return code.reply();
    }
    let cards = match db.cards(deck.id()).await {
        Ok(cards) => cards.len() as i64,
        Err(e) => return oops(e),
    };
    let description = match db.blurb(deck.id()).await {
        Ok(description) => description.unwrap_or_default(),
        Err(e) => return oops(e),
    };
    Code::Okay.with(serde_json::json!({
        "deck": DeckInfoDto {
            name: deck.name().to_string(),
            color: deck.color().to_string(),
            public: deck.public(),
            cards,
            description,
        },
    }))
}

/// GET /get-deck-stats?username=...&deckname=...
///
/// The actor's own feedback history on the named deck, oldest first.
pub async fn get_deck_stats(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    query: web::Query<DeckQuery>,
) -> HttpResponse {
    let me = match actor.id() {
        Some(me) => me,
        None => return Code::AuthRequired.reply(),
    };
    let owner = match owner_of(&db, &query.username).await {
        Ok(Some(owner)) => owner,
        Ok(None) => return Code::UserNotFound.reply(),
        Err(e) => return oops(e),
    };
    let deck = match db.deck(owner.id(), &query.deckname).await {
        Ok(Some(deck)) => deck,
        Ok(None) => return Code::DeckNotFound.reply(),
        Err(e) => return oops(e),
    };
    if let Some(code) = denial(policy::review(&actor, &query.username, deck.public())) {
        return code.reply();
    }
    match db.stats(me, deck.id()).await {
        Ok(stats) => Code::Okay.with(serde_json::json!({
            "stats": stats.iter().map(StatDto::from).collect::<Vec<_>>(),
        })),
        Err(e) => oops(e),
    }
}

/// GET /get-deck-stuff?username=...&deckname=...
///
/// The full editable view: deck metadata, description, every card.
pub async fn get_deck_stuff(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    query: web::Query<DeckQuery>,
) -> HttpResponse {
    if let Some(code) = denial(policy::curate(&actor, &query.username)) {
        return code.reply();
    }
    let me = match actor.id() {
        Some(me) => me,
        None => return Code::AuthRequired.reply(),
    };
    let deck = match db.deck(me, &query.deckname).await {
        Ok(Some(deck)) => deck,
        Ok(None) => return Code::DeckNotFound.reply(),
        Err(e) => return oops(e),
    };
    stuff_view(&db, &deck).await
}

/// POST /update-deck-stuff?username=...
///
/// Upserts the whole editable view in one transaction: deck metadata,
/// description, and the card list. Cards absent from the payload are
/// deleted; unknown card ids become fresh cards.
pub async fn update_deck_stuff(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    writer: web::Data<Writer>,
    query: web::Query<UserQuery>,
    body: web::Json<StuffBody>,
) -> HttpResponse {
    if let Some(code) = denial(policy::curate(&actor, &query.username)) {
        return code.reply();
    }
    let me = match actor.id() {
        Some(me) => me,
        None => return Code::AuthRequired.reply(),
    };
    if let Err(code) = body.validate() {
        return code.reply();
    }
    let deck = Deck::new(
        ID::from(body.deck.id),
        body.deck.name.clone(),
        body.deck.color.clone(),
        body.deck.public,
        me,
    );
    match apply_stuff(&writer, &deck, &body).await {
        Ok(Ok(())) => {}
        Ok(Err(code)) => return code.reply(),
        // Deck names are unique per owner; a collision is a client error.
        Err(e) if collided(&e) => return Code::Validation.reply(),
        Err(e) => return oops(e),
    }
    match db.deck(me, deck.name()).await {
        Ok(Some(deck)) => stuff_view(&db, &deck).await,
        Ok(None) => Code::DeckNotFound.reply(),
        Err(e) => oops(e),
    }
}

/// POST /remove-deck
pub async fn remove_deck(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    body: web::Json<RemoveRequest>,
) -> HttpResponse {
    if let Some(code) = denial(policy::curate(&actor, &body.username)) {
        return code.reply();
    }
    let me = match actor.id() {
        Some(me) => me,
        None => return Code::AuthRequired.reply(),
    };
    let deck = match db.deck(me, &body.deckname).await {
        Ok(Some(deck)) => deck,
        Ok(None) => return Code::DeckNotFound.reply(),
        Err(e) => return oops(e),
    };
    match db.remove(deck.id()).await {
        Ok(_) => Code::Okay.reply(),
        Err(e) => oops(e),
    }
}

/// POST /create-deck
///
/// Creates a private deck under a generated free name, with an empty
/// description and one starter card.
pub async fn create_deck(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    writer: web::Data<Writer>,
    body: web::Json<CreateRequest>,
) -> HttpResponse {
    if let Some(code) = denial(policy::curate(&actor, &body.username)) {
        return code.reply();
    }
    let me = match actor.id() {
        Some(me) => me,
        None => return Code::AuthRequired.reply(),
    };
    let taken = match db.names(me).await {
        Ok(taken) => taken,
        Err(e) => return oops(e),
    };
    let deck = Deck::new(
        ID::default(),
        free_name(&taken),
        "#ffffff".to_string(),
        false,
        me,
    );
    match seed_deck(&writer, &deck).await {
        Ok(Ok(())) => Code::Okay.with(serde_json::json!({
            "deck": DeckDto {
                name: deck.name().to_string(),
                color: deck.color().to_string(),
                public: deck.public(),
                cards: 1,
            },
        })),
        Ok(Err(code)) => code.reply(),
        Err(e) if collided(&e) => Code::Validation.reply(),
        Err(e) => oops(e),
    }
}

/// GET /pull-next-card?deck_owner_username=...&deckname=...
pub async fn pull_next_card(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    selector: web::Data<dyn Selector>,
    query: web::Query<PullQuery>,
) -> HttpResponse {
    if !actor.signed() {
        return Code::AuthRequired.reply();
    }
    let owner = match owner_of(&db, &query.deck_owner_username).await {
        Ok(Some(owner)) => owner,
        Ok(None) => return Code::UserNotFound.reply(),
        Err(e) => return oops(e),
    };
    let deck = match db.deck(owner.id(), &query.deckname).await {
        Ok(Some(deck)) => deck,
        Ok(None) => return Code::DeckNotFound.reply(),
        Err(e) => return oops(e),
    };
    if let Some(code) = denial(policy::pull(&actor, &query.deck_owner_username, deck.public())) {
        return code.reply();
    }
    let cards = match db.cards(deck.id()).await {
        Ok(cards) => cards,
        Err(e) => return oops(e),
    };
    match selector.select(&cards) {
        Some(card) => Code::Okay.with(serde_json::json!({
            "card": CardDto::from(card),
        })),
        None => Code::NoCardsInDeck.reply(),
    }
}

/// POST /post-feedback
pub async fn post_feedback(
    actor: Actor,
    db: web::Data<Arc<Client>>,
    body: web::Json<FeedbackRequest>,
) -> HttpResponse {
    let me = match actor.id() {
        Some(me) => me,
        None => return Code::AuthRequired.reply(),
    };
    let owner = match owner_of(&db, &body.deck_owner_username).await {
        Ok(Some(owner)) => owner,
        Ok(None) => return Code::UserNotFound.reply(),
        Err(e) => return oops(e),
    };
    let deck = match db.deck(owner.id(), &body.deckname).await {
        Ok(Some(deck)) => deck,
        Ok(None) => return Code::DeckNotFound.reply(),
        Err(e) => return oops(e),
    };
    if let Some(code) = denial(policy::feedback(
        &actor,
        &body.deck_owner_username,
        deck.public(),
    )) {
        return code.reply();
    }
    let card = match db.card(deck.id(), ID::from(body.card_id)).await {
        Ok(Some(card)) => card,
        Ok(None) => return Code::CardNotFound.reply(),
        Err(e) => return oops(e),
    };
    match db.record(&Stat::fresh(me, card.id(), body.feedback)).await {
        Ok(()) => Code::Okay.reply(),
        Err(e) => oops(e),
    }
}

/// Renders the full editable view of a deck.
async fn stuff_view(db: &Arc<Client>, deck: &Deck) -> HttpResponse {
    let description = match db.blurb(deck.id()).await {
        Ok(description) => description.unwrap_or_default(),
        Err(e) => return oops(e),
    };
    match db.cards(deck.id()).await {
        Ok(cards) => Code::Okay.with(serde_json::json!({
            "deck": DeckFormDto::of(deck, description),
            "cards": cards.iter().map(CardDto::from).collect::<Vec<_>>(),
        })),
        Err(e) => oops(e),
    }
}

/// Runs the whole deck-stuff upsert in one transaction on the writer
/// connection. A mid-sequence failure aborts with nothing applied.
async fn apply_stuff(
    writer: &Writer,
    deck: &Deck,
    body: &StuffBody,
) -> Result<Result<(), Code>, PgErr> {
    let mut client = writer.lock().await;
    let tx = client.transaction().await?;
    if !tx.update_deck(deck).await? && !tx.insert_deck(deck).await? {
        return Ok(Err(Code::TooMuchData));
    }
    tx.set_blurb(deck.id(), &body.deck.description).await?;
    let keep = body.cards.iter().map(|c| c.id).collect::<Vec<_>>();
    tx.prune_cards(deck.id(), &keep).await?;
    for card in &body.cards {
        tx.upsert_card(deck.id(), ID::from(card.id), &card.question, &card.answer)
            .await?;
    }
    tx.commit().await?;
    Ok(Ok(()))
}

/// Creates a fresh deck with its empty description and starter card.
async fn seed_deck(writer: &Writer, deck: &Deck) -> Result<Result<(), Code>, PgErr> {
    let mut client = writer.lock().await;
    let tx = client.transaction().await?;
    if !tx.insert_deck(deck).await? {
        return Ok(Err(Code::TooMuchData));
    }
    tx.set_blurb(deck.id(), "").await?;
    tx.upsert_card(deck.id(), ID::default(), "New question", "New answer")
        .await?;
    tx.commit().await?;
    Ok(Ok(()))
}

/// First deck name not yet taken by this owner: "New deck", then
/// "New deck 2", "New deck 3", and so on.
fn free_name(taken: &[String]) -> String {
    let mut candidate = "New deck".to_string();
    let mut n = 1usize;
    while taken.iter().any(|name| name == &candidate) {
        n += 1;
        candidate = format!("New deck {}", n);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_name_starts_plain() {
        assert_eq!(free_name(&[]), "New deck");
    }

    #[test]
    fn free_name_skips_taken_names() {
        let taken = ["New deck".to_string(), "New deck 2".to_string()];
        assert_eq!(free_name(&taken), "New deck 3");
    }

    #[test]
    fn free_name_ignores_unrelated_names() {
        let taken = ["spanish".to_string(), "New deck 2".to_string()];
        assert_eq!(free_name(&taken), "New deck");
    }
}
