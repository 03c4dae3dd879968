//! PageChat Store — panel session persistence (credential + conversation history).

pub mod session;
pub mod types;

pub use session::{JsonSessionStore, MemorySessionStore, SessionStore};
pub use types::*;
