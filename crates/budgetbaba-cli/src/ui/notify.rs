//! Transient notifications, printed to stderr so command output stays pipeable.

use budgetbaba_core::{ApiError, SessionError, ValidationError};

pub fn success(message: &str) {
    eprintln!("✓ {}", message);
}

pub fn warning(message: &str) {
    eprintln!("! {}", message);
}

pub fn error(message: &str) {
    eprintln!("✗ {}", message);
}

/// Message to show for a failed command.
///
/// Form and session errors speak for themselves. API errors show the server's
/// message when it sent one, else `fallback`. Anything else gets `fallback`
/// followed by the error chain.
pub fn describe(err: &anyhow::Error, fallback: &str) -> String {
    if let Some(e) = err.downcast_ref::<ValidationError>() {
        return e.to_string();
    }
    if let Some(SessionError::NotLoggedIn) = err.downcast_ref::<SessionError>() {
        return "You are not logged in. Run `budgetbaba login` first.".to_string();
    }
    if let Some(e) = err.downcast_ref::<ApiError>() {
        if e.is_timeout() {
            return "Request timed out. Please try again.".to_string();
        }
        return e.user_message(fallback);
    }
    format!("{}: {:#}", fallback, err)
}
