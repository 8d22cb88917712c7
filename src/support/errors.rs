//! Domain error type shared by every layer, and the field violation it carries

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn employee_not_found(employee_id: i32) -> Self {
        Self::NotFound {
            entity: "Employee",
            field: "employee_id",
            value: employee_id.to_string(),
        }
    }

    /// Field violations carried by a validation failure, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(v) => v,
            _ => &[],
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => Self::DuplicateKey(msg),
            _ => Self::Unexpected(format!("Database error: {}", e)),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
