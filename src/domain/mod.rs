//! Domain layer: the employee aggregate and its persistence contract.

pub mod employee;

pub use employee::{
    Employee, EmployeeFields, EmployeeRepository, EmployeeValidator, PhoneNumber, VoterId,
};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult, Violation};
