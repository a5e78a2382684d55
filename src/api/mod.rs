//! REST API client module for the Snaproom service.
//!
//! This module provides the `ApiClient` for talking to the Snaproom API.
//! Authenticated requests carry a bearer token which is read from the
//! token store on every call.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
