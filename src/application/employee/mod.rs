//! Employee use-cases: request types, aggregate reconciliation, service

pub mod reconciler;
pub mod requests;
pub mod service;

pub use reconciler::{AggregateReconciler, UnmatchedPhonePolicy};
pub use requests::{CreateEmployeeRequest, PhoneNumberEntry, UpdateEmployeeRequest, VoterIdEntry};
pub use service::EmployeeService;
