//! Capture server API integration
//!
//! This module provides:
//! - A blocking REST client for the listing, body, attachment, filter,
//!   mailbox, delete and relay endpoints
//! - The error type shared by every call

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;
