//! Decks, cards, and feedback stats.
//!
//! The flashcard domain: decks owned by accounts, cards belonging to decks,
//! and an append-only feedback log with a per-(account, card) retention cap.
//!
//! ## Core Logic
//!
//! - [`policy`] — Pure visibility and ownership decisions per operation
//! - [`Selector`] — Swappable next-card choice (shipped: uniform random)
//!
//! ## Entities
//!
//! - [`Deck`] — Named card collection with a public/private flag
//! - [`Blurb`] — 1:1 deck description record
//! - [`Card`] — One question/answer pair
//! - [`Stat`] — One right/wrong feedback event
mod blurb;
mod card;
mod deck;
mod selector;
mod stat;

pub mod policy;

pub use blurb::*;
pub use card::*;
pub use deck::*;
pub use selector::*;
pub use stat::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;
