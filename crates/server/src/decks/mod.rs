//! Deck, card, and study endpoints.
mod handlers;

pub use handlers::*;
