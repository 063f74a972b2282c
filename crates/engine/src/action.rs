//! Results of the invoice commands.
//!
//! A command either succeeds with an [`ActionOutcome`] telling the host what
//! to do next, or fails with an [`ActionState`] meant to be rendered back to
//! the form. Failures are values: nothing here is ever raised.

use serde::Serialize;
use thiserror::Error;

use crate::FieldErrors;

/// The write a command was attempting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    fn title(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The input was rejected before touching storage.
    Validation,
    /// The datastore rejected the write.
    Database,
}

/// Error state returned to the form: `{errors, message}`.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ActionState {
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    pub message: String,
    #[serde(skip)]
    pub kind: FailureKind,
}

impl ActionState {
    pub fn invalid(operation: Operation, errors: FieldErrors) -> Self {
        Self {
            errors,
            message: format!("Missing Fields. Failed to {} Invoice.", operation.title()),
            kind: FailureKind::Validation,
        }
    }

    /// Generic failure: the datastore error itself is only logged.
    pub fn database(operation: Operation) -> Self {
        Self {
            errors: FieldErrors::default(),
            message: format!("Database error: Failed to {} invoice", operation.verb()),
            kind: FailureKind::Database,
        }
    }
}

/// What the host must do after a successful command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Navigate the caller to this path.
    Redirect(String),
    /// Stay on the current view; its cached output was invalidated.
    Revalidated,
}

pub type ActionResult = Result<ActionOutcome, ActionState>;
