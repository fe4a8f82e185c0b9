// Error taxonomy shared by the stores, the façade and the HTTP layers

use crate::record::{EntityKind, RecordId};

/// A single field that failed to parse or is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }

    /// "Required field is empty"
    pub fn required(field: &'static str) -> Self {
        Self::new(field, "Required field is empty")
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

/// Errors raised by a [`crate::store::Repository`] or the façade above it.
///
/// Local stores only ever produce `Validation` and `Cycle` (on save);
/// the HTTP-backed store adds `Network`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: RecordId },

    #[error("invalid {kind}: {}", join_fields(.errors))]
    Validation {
        kind: EntityKind,
        errors: Vec<FieldError>,
    },

    #[error("division {id} cannot be placed under {parent_id}: it would become its own ancestor")]
    Cycle { id: RecordId, parent_id: RecordId },

    #[error("request failed: {0}")]
    Network(String),

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl StoreError {
    /// Field-level errors, if this is a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            StoreError::Validation { errors, .. } => errors,
            _ => &[],
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type StoreResult<T> = Result<T, StoreError>;
