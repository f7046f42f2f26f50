//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: the single source of truth for who is logged in
//! - `SessionData` / `SessionState`: the user and token pair and the
//!   Anonymous/Authenticated state derived from it
//!
//! Sessions are mirrored to durable storage so they survive restarts and
//! are cleared on logout or when the API rejects the token.

pub mod session;

pub use session::{SessionData, SessionError, SessionState, SessionStore};
