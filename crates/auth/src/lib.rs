//! Accounts, verification, and identity management.
//!
//! JWT-based authentication with Argon2 password hashing. Accounts are
//! created inactive and become verified exactly once, by presenting the
//! emailed verification code.
//!
//! ## Identity Types
//!
//! - [`Account`] — Registered user with a verified/pending flag
//! - [`Actor`] — Request identity: anonymous or a loaded account
//!
//! ## Security
//!
//! - [`Crypto`] — JWT signing and verification
//! - [`Claims`] — JWT payload structure
//! - [`password`] — Argon2 hashing and verification
//! - [`code`] — Verification code generation and shape checks
mod account;
mod actor;
mod claims;
mod crypto;
mod mailer;

pub mod code;
pub mod password;

pub use account::*;
pub use actor::*;
pub use claims::*;
pub use crypto::*;
pub use mailer::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;

#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use middleware::*;
