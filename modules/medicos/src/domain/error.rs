use thiserror::Error;

use crate::domain::validation::FieldViolation;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed: {}", join_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    #[error("Medico not found: {id}")]
    MedicoNotFound { id: i64 },

    #[error("Medico with the same {field} already exists")]
    DuplicateMedico { field: String },

    #[error("Unknown sort property: '{property}'")]
    InvalidSort { property: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    pub fn medico_not_found(id: i64) -> Self {
        Self::MedicoNotFound { id }
    }

    pub fn duplicate_medico(field: impl Into<String>) -> Self {
        Self::DuplicateMedico {
            field: field.into(),
        }
    }

    pub fn invalid_sort(property: impl Into<String>) -> Self {
        Self::InvalidSort {
            property: property.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
