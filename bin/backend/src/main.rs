//! Cardbox Backend Binary
//!
//! Flashcard backend: accounts, decks, cards, and study sessions.
//! Runs on BIND_ADDR (e.g. 0.0.0.0:8080).

#[tokio::main]
async fn main() {
    cardbox_core::log();
    cardbox_server::run().await.unwrap();
}
