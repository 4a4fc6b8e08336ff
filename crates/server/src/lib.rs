//! HTTP surface for the cardbox flashcard backend.
//!
//! Every endpoint answers with the shared response envelope from
//! [`envelope`]: `{code, message, ...payload}`. Identity arrives as a
//! bearer token and resolves through the infallible `Actor` extractor, so
//! the visibility policy, not the framework, decides what anonymity means
//! per operation.
//!
//! ## Modules
//!
//! - [`accounts`] — Signup, verification, signin, whoami
//! - [`decks`] — Deck, card, study, and feedback endpoints
mod accounts;
mod decks;
mod dto;
mod envelope;

pub use envelope::Code;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use cardbox_auth::Account;
use cardbox_auth::Crypto;
use cardbox_auth::Outbox;
use cardbox_decks::Blurb;
use cardbox_decks::Card;
use cardbox_decks::Deck;
use cardbox_decks::Random;
use cardbox_decks::Selector;
use cardbox_decks::Stat;
use cardbox_pg::PgErr;
use cardbox_pg::Writer;
use cardbox_pg::prepare;
use std::sync::Arc;
use tokio_postgres::Client;

/// Liveness probe that also proves the database is reachable.
async fn health(db: web::Data<Arc<Client>>) -> HttpResponse {
    match db.query_one("SELECT 1", &[]).await {
        Ok(_) => Code::Okay.reply(),
        Err(e) => envelope::oops(e),
    }
}

/// Creates all tables and indices, parents before children so the foreign
/// keys resolve.
pub async fn migrate(db: &Client) -> Result<(), PgErr> {
    prepare::<Account>(db).await?;
    prepare::<Deck>(db).await?;
    prepare::<Blurb>(db).await?;
    prepare::<Card>(db).await?;
    prepare::<Stat>(db).await
}

/// Connects, migrates, and serves until interrupted.
///
/// # Panics
///
/// Panics at startup if the database is unreachable or migration fails.
pub async fn run() -> std::io::Result<()> {
    let db = cardbox_pg::db().await;
    migrate(&db).await.expect("schema migration failed");
    let db = web::Data::new(db);
    let writer = web::Data::new(Writer::connect().await);
    let crypto = web::Data::new(Crypto::from_env());
    let outbox = web::Data::new(Outbox);
    let selector: web::Data<dyn Selector> = web::Data::from(Arc::new(Random) as Arc<dyn Selector>);
    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:8080"));
    log::info!("serving on {}", bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(db.clone())
            .app_data(writer.clone())
            .app_data(crypto.clone())
            .app_data(outbox.clone())
            .app_data(selector.clone())
            // Malformed payloads and query strings answer in the envelope
            // too, instead of the framework's plain-text 400.
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                actix_web::error::InternalError::from_response(err, Code::Validation.reply())
                    .into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                actix_web::error::InternalError::from_response(err, Code::Validation.reply())
                    .into()
            }))
            .route("/health", web::get().to(health))
            .route("/signup", web::post().to(accounts::signup))
            .route("/signup-verify", web::get().to(accounts::signup_verify))
            .route("/signin", web::post().to(accounts::signin))
            .route("/get-me", web::get().to(accounts::me))
            .route("/get-decks", web::get().to(decks::get_decks))
            .route("/get-deck-info", web::get().to(decks::get_deck_info))
            .route("/get-deck-stats", web::get().to(decks::get_deck_stats))
            .route("/get-deck-stuff", web::get().to(decks::get_deck_stuff))
            .route("/update-deck-stuff", web::post().to(decks::update_deck_stuff))
            .route("/create-deck", web::post().to(decks::create_deck))
            .route("/remove-deck", web::post().to(decks::remove_deck))
            .route("/pull-next-card", web::get().to(decks::pull_next_card))
            .route("/post-feedback", web::post().to(decks::post_feedback))
    })
    .workers(6)
    .bind(&bind)?
    .run()
    .await
}
