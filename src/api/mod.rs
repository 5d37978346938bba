//! Suno API module.
//!
//! This module provides:
//! - HTTP client for the studio REST API
//! - Authentication headers
//! - API response types

pub mod auth;
pub mod client;
pub mod types;

pub use client::{SunoApi, USER_AGENT};
pub use types::*;
