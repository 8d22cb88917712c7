//! Employee service: application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate here. Every write goes
//! through the reconciler first, then one repository call that runs in a
//! single transaction.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::reconciler::AggregateReconciler;
use super::requests::{CreateEmployeeRequest, UpdateEmployeeRequest};
use crate::domain::{DomainError, DomainResult, Employee, EmployeeRepository};

pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
    reconciler: AggregateReconciler,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>, reconciler: AggregateReconciler) -> Self {
        Self { repo, reconciler }
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Validate, assemble and persist a new aggregate.
    pub async fn create(&self, request: CreateEmployeeRequest) -> DomainResult<Employee> {
        let employee = self.reconciler.build_new(request, Utc::now())?;
        let employee_id = employee.employee_id;
        let phones = employee.phone_numbers.len();

        let saved = self.repo.insert(employee).await?;

        metrics::counter!("employees_created_total").increment(1);
        info!(employee_id, phones, "Employee created");
        Ok(saved)
    }

    /// Merge an update request into the stored aggregate and persist the result.
    pub async fn update(
        &self,
        employee_id: i32,
        request: UpdateEmployeeRequest,
    ) -> DomainResult<Employee> {
        let existing = self
            .repo
            .find_by_id_with_children(employee_id)
            .await?
            .ok_or_else(|| DomainError::employee_not_found(employee_id))?;

        let merged = self.reconciler.merge_update(existing, request, Utc::now())?;
        let saved = self.repo.save(merged).await?;

        metrics::counter!("employees_updated_total").increment(1);
        info!(
            employee_id,
            phones = saved.phone_numbers.len(),
            "Employee updated"
        );
        Ok(saved)
    }

    /// Delete an employee and its children. Unknown ids succeed.
    pub async fn delete(&self, employee_id: i32) -> DomainResult<()> {
        self.repo.delete_by_id(employee_id).await?;
        metrics::counter!("employees_deleted_total").increment(1);
        info!(employee_id, "Employee deleted");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_by_id(&self, employee_id: i32) -> DomainResult<Employee> {
        self.repo
            .find_by_id_with_children(employee_id)
            .await?
            .ok_or_else(|| DomainError::employee_not_found(employee_id))
    }

    /// Employees reporting to `manager_id`; empty when there are none.
    pub async fn get_by_manager_id(&self, manager_id: i32) -> DomainResult<Vec<Employee>> {
        self.repo.find_by_manager_id(manager_id).await
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Employee>> {
        self.repo.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::employee::{
        PhoneNumberEntry, UnmatchedPhonePolicy, VoterIdEntry,
    };
    use crate::domain::EmployeeValidator;
    use crate::infrastructure::storage::InMemoryEmployeeRepository;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn service() -> (EmployeeService, Arc<InMemoryEmployeeRepository>) {
        let repo = Arc::new(InMemoryEmployeeRepository::new());
        let service = EmployeeService::new(repo.clone(), AggregateReconciler::default());
        (service, repo)
    }

    fn alice() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            employee_id: Some(1),
            name: Some("Alice".into()),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1),
            manager_id: Some(101),
            salary: Some(Decimal::from_str("50000.00").unwrap()),
            email_id: Some("a@x.com".into()),
            phone_numbers: vec![
                PhoneNumberEntry::new("555", "X", "mobile"),
                PhoneNumberEntry::new("555", "X", "mobile"),
            ],
            voter_id: Some(VoterIdEntry {
                voter_number: Some("V-1".into()),
                city: Some("Pune".into()),
                ..Default::default()
            }),
        }
    }

    fn alice_update(phones: Vec<PhoneNumberEntry>) -> UpdateEmployeeRequest {
        UpdateEmployeeRequest {
            name: Some("Alice".into()),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1),
            manager_id: Some(103),
            salary: Some(Decimal::from_str("55000.00").unwrap()),
            email_id: Some("a@x.com".into()),
            phone_numbers: phones,
            voter_id: None,
        }
    }

    #[tokio::test]
    async fn create_stores_deduplicated_aggregate() {
        let (service, _) = service();
        service.create(alice()).await.unwrap();

        let stored = service.get_by_id(1).await.unwrap();
        assert_eq!(stored.phone_numbers.len(), 1);
        assert!(stored.phone_numbers[0].phone_id.is_some());
        let voter = stored.voter_id.unwrap();
        assert!(voter.voter_id.is_some());
        assert_eq!(voter.city.as_deref(), Some("Pune"));
    }

    #[tokio::test]
    async fn create_with_taken_id_is_duplicate_key() {
        let (service, _) = service();
        service.create(alice()).await.unwrap();
        let err = service.create(alice()).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let (service, _) = service();
        let request = CreateEmployeeRequest {
            salary: Some(Decimal::from_str("1000000.00").unwrap()),
            ..alice()
        };
        assert!(matches!(
            service.create(request).await,
            Err(DomainError::Validation(_))
        ));
        assert!(service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_employee_is_not_found() {
        let (service, _) = service();
        let err = service.update(42, alice_update(vec![])).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Employee", .. }));
    }

    #[tokio::test]
    async fn update_matches_existing_phone_in_place() {
        let (service, repo) = service();
        let created = service.create(alice()).await.unwrap();
        let phone_id = created.phone_numbers[0].phone_id.unwrap();

        let updated = service
            .update(
                1,
                alice_update(vec![PhoneNumberEntry::new("556", "X", "mobile").with_id(phone_id)]),
            )
            .await
            .unwrap();

        assert_eq!(updated.manager_id, 103);
        assert_eq!(updated.phone_numbers.len(), 1);
        assert_eq!(updated.phone_numbers[0].phone_id, Some(phone_id));

        let rows = repo.find_phone_numbers(1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].phone_number, "556");
    }

    #[tokio::test]
    async fn update_with_unknown_phone_id_empties_phone_set() {
        let (service, repo) = service();
        service.create(alice()).await.unwrap();

        let updated = service
            .update(1, alice_update(vec![PhoneNumberEntry {
                phone_id: Some(99),
                phone_number: Some("777".into()),
                ..Default::default()
            }]))
            .await
            .unwrap();

        assert!(updated.phone_numbers.is_empty());
        assert!(repo.find_phone_numbers(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reject_policy_leaves_stored_aggregate_untouched() {
        let repo = Arc::new(InMemoryEmployeeRepository::new());
        let reconciler = AggregateReconciler::new(EmployeeValidator::new())
            .with_unmatched_phone_policy(UnmatchedPhonePolicy::Reject);
        let service = EmployeeService::new(repo.clone(), reconciler);
        service.create(alice()).await.unwrap();

        let err = service
            .update(1, alice_update(vec![PhoneNumberEntry::new("777", "X", "mobile").with_id(99)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { entity: "PhoneNumber", .. }));
        assert_eq!(repo.find_phone_numbers(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_voter_row_and_keeps_created_at() {
        let (service, _) = service();
        let created = service.create(alice()).await.unwrap();
        let old_voter = created.voter_id.clone().unwrap().voter_id;

        let updated = service.update(1, alice_update(vec![])).await.unwrap();

        let voter = updated.voter_id.unwrap();
        assert_ne!(voter.voter_id, old_voter);
        assert_eq!(voter.voter_number, None);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn delete_removes_children_and_is_idempotent() {
        let (service, repo) = service();
        service.create(alice()).await.unwrap();

        service.delete(1).await.unwrap();
        service.delete(1).await.unwrap();

        assert!(matches!(
            service.get_by_id(1).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(repo.find_phone_numbers(1).await.unwrap().is_empty());
        assert!(repo.find_missing_voter_id().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manager_query_returns_empty_list_when_none_match() {
        let (service, _) = service();
        service.create(alice()).await.unwrap();

        assert_eq!(service.get_by_manager_id(101).await.unwrap().len(), 1);
        assert!(service.get_by_manager_id(105).await.unwrap().is_empty());
    }
}
