//! Data models for Snaproom entities.
//!
//! Request and response bodies are typed per endpoint rather than passed
//! around as loose JSON values.

pub mod user;

pub use user::{Credentials, LoginResponse, User, UserUpdate};
