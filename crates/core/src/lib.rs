//! Core types, traits, and limits for cardbox.
//!
//! This crate provides the foundational identifier types and the capacity
//! and field-length constants shared across the cardbox workspace.
#![allow(dead_code)]

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// CAPACITY LIMITS
// Enforced by compute-then-compare inside the mutating SQL statement, never
// by in-memory counters.
// ============================================================================
/// Maximum number of accounts awaiting email verification at once.
/// Signup is refused while the queue is full.
pub const ACCOUNT_VERIFICATION_QUEUE_LIMIT: usize = 20;
/// Maximum number of decks per account.
pub const USER_DECK_LIMIT: usize = 30;
/// Maximum number of cards per deck, checked at bulk-update time.
pub const DECK_CARD_LIMIT: usize = 100;
/// Maximum stat rows retained per (account, card) pair. Oldest rows are
/// evicted after insert, never before.
pub const USER_CARD_STAT_LIMIT: usize = 100;

// ============================================================================
// FIELD LENGTHS
// ============================================================================
/// Length of the email verification code.
pub const VERIFICATION_CODE_LENGTH: usize = 32;
/// Maximum length of username, email, and password at signup.
pub const SIGNUP_FIELD_MAX: usize = 20;
/// Deck names are 1..=16 characters.
pub const DECK_NAME_MAX: usize = 16;
/// Deck colors are 7-character codes ("#rrggbb").
pub const DECK_COLOR_LENGTH: usize = 7;
/// Maximum length of a deck description.
pub const DECK_DESCRIPTION_MAX: usize = 2500;
/// Maximum length of a card question or answer.
pub const CARD_TEXT_MAX: usize = 200;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn id_roundtrips_through_uuid() {
        let id = ID::<Marker>::default();
        assert_eq!(id, ID::from(uuid::Uuid::from(id)));
    }

    #[test]
    fn id_cast_preserves_inner() {
        struct Other;
        let id = ID::<Marker>::default();
        assert_eq!(id.inner(), id.cast::<Other>().inner());
    }

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(ID::<Marker>::default(), ID::<Marker>::default());
    }
}
