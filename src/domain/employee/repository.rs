//! Employee repository interface

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::{Employee, PhoneNumber};
use crate::domain::DomainResult;

/// Persistence for the employee aggregate.
///
/// Writes (`insert`, `save`, `delete_by_id`) are atomic over the whole
/// aggregate: root, phone numbers and voter record commit together or not at all.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Root only. Children are not loaded.
    async fn find_by_id(&self, employee_id: i32) -> DomainResult<Option<Employee>>;

    /// Root with phone numbers and voter record populated.
    async fn find_by_id_with_children(&self, employee_id: i32) -> DomainResult<Option<Employee>>;

    async fn find_by_manager_id(&self, manager_id: i32) -> DomainResult<Vec<Employee>>;

    /// Employees whose salary is strictly greater than `threshold`.
    async fn find_by_salary_greater_than(&self, threshold: Decimal) -> DomainResult<Vec<Employee>>;

    /// Employees without a voter record.
    async fn find_missing_voter_id(&self) -> DomainResult<Vec<Employee>>;

    async fn find_all(&self) -> DomainResult<Vec<Employee>>;

    async fn find_phone_numbers(&self, employee_id: i32) -> DomainResult<Vec<PhoneNumber>>;

    /// Insert a new aggregate. Fails with `DuplicateKey` if the id is taken.
    async fn insert(&self, employee: Employee) -> DomainResult<Employee>;

    /// Insert-or-replace by id. Stored children absent from the aggregate
    /// are deleted; new children get their storage ids assigned.
    async fn save(&self, employee: Employee) -> DomainResult<Employee>;

    /// Delete the root and all its children. Missing ids are not an error.
    async fn delete_by_id(&self, employee_id: i32) -> DomainResult<()>;
}
