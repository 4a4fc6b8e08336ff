//! Account lifecycle endpoints: signup, verification, signin, whoami.
mod handlers;

pub use handlers::*;
