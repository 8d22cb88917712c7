//! Employee aggregate
//!
//! The employee root, its owned phone numbers and voter record,
//! the repository interface and the field rules.

pub mod model;
pub mod repository;
pub mod validation;

pub use model::{Employee, PhoneNumber, VoterId};
pub use repository::EmployeeRepository;
pub use validation::{EmployeeFields, EmployeeValidator};
