//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an invoice or customer does not exist.
//! - [`InvalidInput`] thrown when a stored or supplied value can't be decoded.
//! - [`MissingField`] thrown when the engine is built without a collaborator.
//! - [`Hashing`] thrown when a password can't be hashed.
//! - [`Database`] wrapping any datastore failure.
//!
//! Command handlers never surface these directly: they turn them into an
//! [`ActionState`] instead.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`MissingField`]: EngineError::MissingField
//!  [`Hashing`]: EngineError::Hashing
//!  [`Database`]: EngineError::Database
//!  [`ActionState`]: crate::ActionState
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::Hashing(a), Self::Hashing(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
