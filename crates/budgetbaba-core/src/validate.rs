//! Client-side form validation.
//!
//! Every check here runs before a request is built, so invalid input never
//! reaches the network.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{CategoryRequest, NewTransaction};

/// Minimum password length accepted by the login and sign-up forms.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid full name.")]
    MissingFullName,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,

    #[error("Please enter a category name")]
    MissingCategoryName,

    #[error("Please enter a name")]
    MissingName,

    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Please select a category")]
    MissingCategory,

    #[error("Please select a date")]
    MissingDate,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email_regex().is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Blank passwords are rejected; otherwise the length counts surrounding spaces.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() || password.chars().count() < MIN_PASSWORD_LENGTH {
        Err(ValidationError::PasswordTooShort)
    } else {
        Ok(())
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)
}

pub fn validate_registration(full_name: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    if full_name.trim().is_empty() {
        return Err(ValidationError::MissingFullName);
    }
    validate_login(email, password)
}

pub fn validate_category(category: &CategoryRequest) -> Result<(), ValidationError> {
    if category.name.trim().is_empty() {
        return Err(ValidationError::MissingCategoryName);
    }
    Ok(())
}

pub fn validate_transaction(transaction: &NewTransaction) -> Result<(), ValidationError> {
    if transaction.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !transaction.amount.is_finite() || transaction.amount <= 0.0 {
        return Err(ValidationError::InvalidAmount);
    }
    if transaction.category_id.is_none() {
        return Err(ValidationError::MissingCategory);
    }
    if transaction.date.is_none() {
        return Err(ValidationError::MissingDate);
    }
    Ok(())
}
