use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MedicosError {
    #[error("Medico not found: {id}")]
    NotFound { id: i64 },

    #[error("Medico with the same {field} already exists")]
    Conflict { field: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl MedicosError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(field: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for MedicosError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::MedicoNotFound { id } => Self::not_found(id),
            DomainError::DuplicateMedico { field } => Self::conflict(field),
            e @ (DomainError::Validation { .. } | DomainError::InvalidSort { .. }) => {
                Self::validation(e.to_string())
            }
            DomainError::Database { .. } => Self::internal(),
        }
    }
}
