//! Authentication module for session state and token storage.
//!
//! This module provides:
//! - `AuthSession`: the session state machine (login, logout, startup
//!   token validation)
//! - `TokenStore`: opaque durable storage for the bearer token, with a
//!   file-backed implementation and an in-memory one for tests

pub mod session;
pub mod store;

pub use session::{AuthPhase, AuthSession};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
