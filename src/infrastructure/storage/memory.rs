//! In-memory employee repository for development and testing

use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::domain::{
    DomainError, DomainResult, Employee, EmployeeRepository, PhoneNumber,
};

/// Whole aggregates keyed by employee id. Child ids come from counters
/// and are never reused.
pub struct InMemoryEmployeeRepository {
    employees: DashMap<i32, Employee>,
    phone_counter: AtomicI32,
    voter_counter: AtomicI32,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self {
            employees: DashMap::new(),
            phone_counter: AtomicI32::new(1),
            voter_counter: AtomicI32::new(1),
        }
    }

    /// Give new children ids; children carrying an id `previous` does not
    /// own are treated as new.
    fn assign_ids(&self, mut employee: Employee, previous: Option<&Employee>) -> Employee {
        let owned: HashSet<i32> = previous
            .map(|p| p.phone_numbers.iter().filter_map(|ph| ph.phone_id).collect())
            .unwrap_or_default();
        for phone in &mut employee.phone_numbers {
            if !phone.phone_id.is_some_and(|id| owned.contains(&id)) {
                phone.phone_id = Some(self.phone_counter.fetch_add(1, Ordering::SeqCst));
            }
        }

        let owned_voter = previous.and_then(|p| p.voter_id.as_ref()).and_then(|v| v.voter_id);
        if let Some(voter) = employee.voter_id.as_mut() {
            if voter.voter_id.is_none() || voter.voter_id != owned_voter {
                voter.voter_id = Some(self.voter_counter.fetch_add(1, Ordering::SeqCst));
            }
        }
        employee
    }

    fn collect_sorted(&self, keep: impl Fn(&Employee) -> bool) -> Vec<Employee> {
        let mut employees: Vec<Employee> = self
            .employees
            .iter()
            .filter(|e| keep(e.value()))
            .map(|e| e.value().clone())
            .collect();
        employees.sort_by_key(|e| e.employee_id);
        employees
    }
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(&self, employee_id: i32) -> DomainResult<Option<Employee>> {
        Ok(self.employees.get(&employee_id).map(|e| {
            let mut root = e.clone();
            root.phone_numbers.clear();
            root.voter_id = None;
            root
        }))
    }

    async fn find_by_id_with_children(&self, employee_id: i32) -> DomainResult<Option<Employee>> {
        Ok(self.employees.get(&employee_id).map(|e| e.clone()))
    }

    async fn find_by_manager_id(&self, manager_id: i32) -> DomainResult<Vec<Employee>> {
        Ok(self.collect_sorted(|e| e.manager_id == manager_id))
    }

    async fn find_by_salary_greater_than(&self, threshold: Decimal) -> DomainResult<Vec<Employee>> {
        Ok(self.collect_sorted(|e| e.salary > threshold))
    }

    async fn find_missing_voter_id(&self) -> DomainResult<Vec<Employee>> {
        Ok(self.collect_sorted(|e| !e.has_voter_id()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Employee>> {
        Ok(self.collect_sorted(|_| true))
    }

    async fn find_phone_numbers(&self, employee_id: i32) -> DomainResult<Vec<PhoneNumber>> {
        Ok(self
            .employees
            .get(&employee_id)
            .map(|e| e.phone_numbers.clone())
            .unwrap_or_default())
    }

    async fn insert(&self, employee: Employee) -> DomainResult<Employee> {
        match self.employees.entry(employee.employee_id) {
            Entry::Occupied(_) => Err(DomainError::DuplicateKey(format!(
                "employee_id {} already exists",
                employee.employee_id
            ))),
            Entry::Vacant(slot) => {
                let saved = self.assign_ids(employee, None);
                slot.insert(saved.clone());
                Ok(saved)
            }
        }
    }

    async fn save(&self, employee: Employee) -> DomainResult<Employee> {
        match self.employees.entry(employee.employee_id) {
            Entry::Occupied(mut slot) => {
                let saved = self.assign_ids(employee, Some(slot.get()));
                slot.insert(saved.clone());
                Ok(saved)
            }
            Entry::Vacant(slot) => {
                let saved = self.assign_ids(employee, None);
                slot.insert(saved.clone());
                Ok(saved)
            }
        }
    }

    async fn delete_by_id(&self, employee_id: i32) -> DomainResult<()> {
        self.employees.remove(&employee_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VoterId;
    use chrono::NaiveDate;

    fn employee(id: i32) -> Employee {
        let mut e = Employee::new(
            id,
            "Erin",
            NaiveDate::from_ymd_opt(1992, 4, 4).unwrap(),
            101,
            Decimal::new(7_500_000, 2),
            "erin@x.com",
        );
        e.add_phone_number(PhoneNumber::new("555", "X", "mobile"));
        e.set_voter_id(Some(VoterId::default()));
        e
    }

    #[tokio::test]
    async fn save_keeps_owned_ids_and_replaces_foreign_ones() {
        let repo = InMemoryEmployeeRepository::new();
        let mut stored = repo.insert(employee(1)).await.unwrap();
        let phone_id = stored.phone_numbers[0].phone_id;
        let voter_id = stored.voter_id.as_ref().unwrap().voter_id;

        stored.add_phone_number(PhoneNumber {
            phone_id: Some(500),
            ..PhoneNumber::new("777", "Y", "home")
        });
        let saved = repo.save(stored).await.unwrap();

        assert_eq!(saved.phone_numbers[0].phone_id, phone_id);
        assert_ne!(saved.phone_numbers[1].phone_id, Some(500));
        assert_eq!(saved.voter_id.unwrap().voter_id, voter_id);
    }

    #[tokio::test]
    async fn insert_rejects_taken_id() {
        let repo = InMemoryEmployeeRepository::new();
        repo.insert(employee(1)).await.unwrap();
        assert!(matches!(
            repo.insert(employee(1)).await,
            Err(DomainError::DuplicateKey(_))
        ));
    }

    #[tokio::test]
    async fn find_by_id_strips_children() {
        let repo = InMemoryEmployeeRepository::new();
        repo.insert(employee(1)).await.unwrap();
        let root = repo.find_by_id(1).await.unwrap().unwrap();
        assert!(root.phone_numbers.is_empty());
        assert!(!root.has_voter_id());
    }
}
