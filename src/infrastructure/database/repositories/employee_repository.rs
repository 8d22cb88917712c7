//! SeaORM implementation of EmployeeRepository
//!
//! Child rows are never cascaded implicitly. Every write computes the diff
//! between the stored rows and the aggregate and issues the inserts,
//! updates and deletes itself, inside one transaction.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    DomainError, DomainResult, Employee, EmployeeRepository, PhoneNumber, VoterId,
};
use crate::infrastructure::database::entities::{employee, phone_number, voter_id};

// ── Conversion helpers ──────────────────────────────────────────

fn salary_to_column(salary: Decimal) -> DomainResult<f64> {
    salary
        .to_f64()
        .ok_or_else(|| DomainError::Unexpected(format!("Salary {} cannot be stored", salary)))
}

fn salary_from_column(value: f64) -> DomainResult<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| DomainError::Unexpected(format!("Stored salary {} is not a number", value)))
}

fn root_to_domain(m: employee::Model) -> DomainResult<Employee> {
    Ok(Employee {
        employee_id: m.employee_id,
        name: m.name,
        dob: m.dob,
        manager_id: m.manager_id,
        salary: salary_from_column(m.salary)?,
        email_id: m.email_id,
        phone_numbers: Vec::new(),
        voter_id: None,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn root_to_active(e: &Employee) -> DomainResult<employee::ActiveModel> {
    Ok(employee::ActiveModel {
        employee_id: Set(e.employee_id),
        name: Set(e.name.clone()),
        dob: Set(e.dob),
        manager_id: Set(e.manager_id),
        salary: Set(salary_to_column(e.salary)?),
        email_id: Set(e.email_id.clone()),
        created_at: Set(e.created_at),
        updated_at: Set(e.updated_at),
    })
}

fn phone_to_domain(m: phone_number::Model) -> PhoneNumber {
    PhoneNumber {
        phone_id: Some(m.phone_id),
        employee_id: m.employee_id,
        phone_number: m.phone_number,
        provider: m.provider,
        phone_type: m.phone_type,
    }
}

fn voter_to_domain(m: voter_id::Model) -> VoterId {
    VoterId {
        voter_id: Some(m.voter_id),
        employee_id: m.employee_id,
        voter_number: m.voter_number,
        city: m.city,
    }
}

/// Attach phone numbers and voter records to a batch of root rows.
async fn load_aggregates<C: ConnectionTrait>(
    conn: &C,
    roots: Vec<employee::Model>,
) -> DomainResult<Vec<Employee>> {
    if roots.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = roots.iter().map(|r| r.employee_id).collect();

    let mut phones: HashMap<i32, Vec<PhoneNumber>> = HashMap::new();
    for row in phone_number::Entity::find()
        .filter(phone_number::Column::EmployeeId.is_in(ids.clone()))
        .order_by_asc(phone_number::Column::PhoneId)
        .all(conn)
        .await?
    {
        phones
            .entry(row.employee_id)
            .or_default()
            .push(phone_to_domain(row));
    }

    let mut voters: HashMap<i32, VoterId> = voter_id::Entity::find()
        .filter(voter_id::Column::EmployeeId.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|row| (row.employee_id, voter_to_domain(row)))
        .collect();

    roots
        .into_iter()
        .map(|root| {
            let employee_id = root.employee_id;
            let mut employee = root_to_domain(root)?;
            employee.phone_numbers = phones.remove(&employee_id).unwrap_or_default();
            employee.voter_id = voters.remove(&employee_id);
            Ok(employee)
        })
        .collect()
}

/// Bring the stored child rows in line with the aggregate and return it
/// with every child's storage id filled in.
async fn sync_children<C: ConnectionTrait>(
    conn: &C,
    mut employee: Employee,
) -> DomainResult<Employee> {
    let employee_id = employee.employee_id;

    // ── Phone numbers ──
    let stored: HashSet<i32> = phone_number::Entity::find()
        .filter(phone_number::Column::EmployeeId.eq(employee_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|row| row.phone_id)
        .collect();
    let kept: HashSet<i32> = employee
        .phone_numbers
        .iter()
        .filter_map(|p| p.phone_id)
        .filter(|id| stored.contains(id))
        .collect();

    let orphans: Vec<i32> = stored.difference(&kept).copied().collect();
    if !orphans.is_empty() {
        debug!("Deleting {} orphaned phone(s) of employee {}", orphans.len(), employee_id);
        phone_number::Entity::delete_many()
            .filter(phone_number::Column::PhoneId.is_in(orphans))
            .exec(conn)
            .await?;
    }

    let mut phones = Vec::with_capacity(employee.phone_numbers.len());
    for phone in std::mem::take(&mut employee.phone_numbers) {
        let row = phone_number::ActiveModel {
            phone_id: NotSet,
            employee_id: Set(employee_id),
            phone_number: Set(phone.phone_number),
            provider: Set(phone.provider),
            phone_type: Set(phone.phone_type),
        };
        let model = match phone.phone_id.filter(|id| kept.contains(id)) {
            Some(phone_id) => {
                phone_number::ActiveModel {
                    phone_id: Set(phone_id),
                    ..row
                }
                .update(conn)
                .await?
            }
            None => row.insert(conn).await?,
        };
        phones.push(phone_to_domain(model));
    }
    employee.phone_numbers = phones;

    // ── Voter record ──
    let stored_voter = voter_id::Entity::find()
        .filter(voter_id::Column::EmployeeId.eq(employee_id))
        .one(conn)
        .await?;
    let incoming = employee.voter_id.take();

    employee.voter_id = match (stored_voter, incoming) {
        (Some(current), Some(voter)) if voter.voter_id == Some(current.voter_id) => {
            let model = voter_id::ActiveModel {
                voter_id: Set(current.voter_id),
                employee_id: Set(employee_id),
                voter_number: Set(voter.voter_number),
                city: Set(voter.city),
            }
            .update(conn)
            .await?;
            Some(voter_to_domain(model))
        }
        (current, incoming) => {
            // Delete first: the unique index allows one row per employee.
            if let Some(current) = current {
                voter_id::Entity::delete_by_id(current.voter_id)
                    .exec(conn)
                    .await?;
            }
            match incoming {
                Some(voter) => {
                    let model = voter_id::ActiveModel {
                        voter_id: NotSet,
                        employee_id: Set(employee_id),
                        voter_number: Set(voter.voter_number),
                        city: Set(voter.city),
                    }
                    .insert(conn)
                    .await?;
                    Some(voter_to_domain(model))
                }
                None => None,
            }
        }
    };

    Ok(employee)
}

// ── SeaOrmEmployeeRepository ────────────────────────────────────

pub struct SeaOrmEmployeeRepository {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get database connection reference
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    async fn find_by_id(&self, employee_id: i32) -> DomainResult<Option<Employee>> {
        employee::Entity::find_by_id(employee_id)
            .one(&self.db)
            .await?
            .map(root_to_domain)
            .transpose()
    }

    async fn find_by_id_with_children(&self, employee_id: i32) -> DomainResult<Option<Employee>> {
        let Some(root) = employee::Entity::find_by_id(employee_id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(load_aggregates(&self.db, vec![root]).await?.pop())
    }

    async fn find_by_manager_id(&self, manager_id: i32) -> DomainResult<Vec<Employee>> {
        let roots = employee::Entity::find()
            .filter(employee::Column::ManagerId.eq(manager_id))
            .order_by_asc(employee::Column::EmployeeId)
            .all(&self.db)
            .await?;
        load_aggregates(&self.db, roots).await
    }

    async fn find_by_salary_greater_than(&self, threshold: Decimal) -> DomainResult<Vec<Employee>> {
        let roots = employee::Entity::find()
            .filter(employee::Column::Salary.gt(salary_to_column(threshold)?))
            .order_by_asc(employee::Column::EmployeeId)
            .all(&self.db)
            .await?;
        load_aggregates(&self.db, roots).await
    }

    async fn find_missing_voter_id(&self) -> DomainResult<Vec<Employee>> {
        let with_voter = Query::select()
            .column(voter_id::Column::EmployeeId)
            .from(voter_id::Entity)
            .to_owned();
        let roots = employee::Entity::find()
            .filter(employee::Column::EmployeeId.not_in_subquery(with_voter))
            .order_by_asc(employee::Column::EmployeeId)
            .all(&self.db)
            .await?;
        load_aggregates(&self.db, roots).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Employee>> {
        let roots = employee::Entity::find()
            .order_by_asc(employee::Column::EmployeeId)
            .all(&self.db)
            .await?;
        load_aggregates(&self.db, roots).await
    }

    async fn find_phone_numbers(&self, employee_id: i32) -> DomainResult<Vec<PhoneNumber>> {
        let rows = phone_number::Entity::find()
            .filter(phone_number::Column::EmployeeId.eq(employee_id))
            .order_by_asc(phone_number::Column::PhoneId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(phone_to_domain).collect())
    }

    async fn insert(&self, employee: Employee) -> DomainResult<Employee> {
        let txn = self.db.begin().await?;

        if employee::Entity::find_by_id(employee.employee_id)
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateKey(format!(
                "employee_id {} already exists",
                employee.employee_id
            )));
        }

        root_to_active(&employee)?.insert(&txn).await?;
        let saved = sync_children(&txn, employee).await?;
        txn.commit().await?;

        info!(
            "Employee inserted: {} ({} phone(s))",
            saved.employee_id,
            saved.phone_numbers.len()
        );
        Ok(saved)
    }

    async fn save(&self, employee: Employee) -> DomainResult<Employee> {
        let txn = self.db.begin().await?;

        let exists = employee::Entity::find_by_id(employee.employee_id)
            .one(&txn)
            .await?
            .is_some();
        let root = root_to_active(&employee)?;
        if exists {
            root.update(&txn).await?;
        } else {
            root.insert(&txn).await?;
        }
        let saved = sync_children(&txn, employee).await?;
        txn.commit().await?;

        info!(
            "Employee saved: {} ({} phone(s))",
            saved.employee_id,
            saved.phone_numbers.len()
        );
        Ok(saved)
    }

    async fn delete_by_id(&self, employee_id: i32) -> DomainResult<()> {
        let txn = self.db.begin().await?;

        phone_number::Entity::delete_many()
            .filter(phone_number::Column::EmployeeId.eq(employee_id))
            .exec(&txn)
            .await?;
        voter_id::Entity::delete_many()
            .filter(voter_id::Column::EmployeeId.eq(employee_id))
            .exec(&txn)
            .await?;
        let result = employee::Entity::delete_by_id(employee_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        if result.rows_affected == 0 {
            debug!("Delete of unknown employee {} ignored", employee_id);
        } else {
            info!("Employee deleted: {}", employee_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::migrator::{Migrator, MigratorTrait};
    use crate::infrastructure::database::{init_database, DatabaseConfig};
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;

    async fn repo() -> SeaOrmEmployeeRepository {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmEmployeeRepository::new(db)
    }

    fn employee(id: i32, manager_id: i32, salary: &str) -> Employee {
        Employee::new(
            id,
            "Alice",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            manager_id,
            Decimal::from_str(salary).unwrap(),
            "a@x.com",
        )
    }

    fn with_children(mut e: Employee) -> Employee {
        e.add_phone_number(PhoneNumber::new("555", "X", "mobile"));
        e.add_phone_number(PhoneNumber::new("666", "Y", "home"));
        e.set_voter_id(Some(VoterId {
            voter_number: Some("V-1".into()),
            city: Some("Pune".into()),
            ..Default::default()
        }));
        e
    }

    #[tokio::test]
    async fn insert_assigns_child_ids_and_loads_back() {
        let repo = repo().await;
        let saved = repo.insert(with_children(employee(1, 101, "50000.00"))).await.unwrap();

        assert!(saved.phone_numbers.iter().all(|p| p.phone_id.is_some()));
        assert!(saved.voter_id.as_ref().unwrap().voter_id.is_some());

        let loaded = repo.find_by_id_with_children(1).await.unwrap().unwrap();
        assert_eq!(loaded.phone_numbers, saved.phone_numbers);
        assert_eq!(loaded.voter_id, saved.voter_id);
        assert_eq!(loaded.salary, Decimal::from_str("50000.00").unwrap());
    }

    #[tokio::test]
    async fn find_by_id_returns_root_only() {
        let repo = repo().await;
        repo.insert(with_children(employee(1, 101, "50000.00"))).await.unwrap();

        let root = repo.find_by_id(1).await.unwrap().unwrap();
        assert!(root.phone_numbers.is_empty());
        assert!(root.voter_id.is_none());
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_of_existing_id_is_duplicate_key() {
        let repo = repo().await;
        repo.insert(employee(1, 101, "50000.00")).await.unwrap();
        let err = repo.insert(employee(1, 102, "1.00")).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(_)));
        // The first write is untouched
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().manager_id, 101);
    }

    #[tokio::test]
    async fn save_updates_matched_phone_and_deletes_orphans() {
        let repo = repo().await;
        let mut stored = repo.insert(with_children(employee(1, 101, "50000.00"))).await.unwrap();
        let kept_id = stored.phone_numbers[0].phone_id;

        stored.phone_numbers.truncate(1);
        stored.phone_numbers[0].phone_number = "556".into();
        stored.add_phone_number(PhoneNumber::new("777", "Z", "work"));
        let saved = repo.save(stored).await.unwrap();

        let rows = repo.find_phone_numbers(1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].phone_id, kept_id);
        assert_eq!(rows[0].phone_number, "556");
        assert_eq!(rows[1].phone_number, "777");
        assert_eq!(rows, saved.phone_numbers);
    }

    #[tokio::test]
    async fn save_with_fresh_voter_replaces_row() {
        let repo = repo().await;
        let mut stored = repo.insert(with_children(employee(1, 101, "50000.00"))).await.unwrap();
        let old_voter = stored.voter_id.as_ref().unwrap().voter_id;

        stored.set_voter_id(Some(VoterId::default()));
        let saved = repo.save(stored).await.unwrap();

        let voter = saved.voter_id.unwrap();
        assert_ne!(voter.voter_id, old_voter);
        assert_eq!(voter.voter_number, None);
        let loaded = repo.find_by_id_with_children(1).await.unwrap().unwrap();
        assert_eq!(loaded.voter_id.unwrap().voter_id, voter.voter_id);
    }

    #[tokio::test]
    async fn save_without_voter_removes_row() {
        let repo = repo().await;
        let mut stored = repo.insert(with_children(employee(1, 101, "50000.00"))).await.unwrap();
        stored.set_voter_id(None);
        repo.save(stored).await.unwrap();

        let missing = repo.find_missing_voter_id().await.unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].employee_id, 1);
    }

    #[tokio::test]
    async fn save_of_unknown_id_inserts() {
        let repo = repo().await;
        let mut e = employee(9, 105, "10.50");
        e.updated_at = Utc::now();
        repo.save(e).await.unwrap();
        assert!(repo.find_by_id(9).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_removes_aggregate_and_is_idempotent() {
        let repo = repo().await;
        repo.insert(with_children(employee(1, 101, "50000.00"))).await.unwrap();

        repo.delete_by_id(1).await.unwrap();
        repo.delete_by_id(1).await.unwrap();

        assert!(repo.find_by_id(1).await.unwrap().is_none());
        assert!(repo.find_phone_numbers(1).await.unwrap().is_empty());
        let voters = voter_id::Entity::find().all(repo.connection()).await.unwrap();
        assert!(voters.is_empty());
    }

    #[tokio::test]
    async fn queries_filter_by_manager_salary_and_voter() {
        let repo = repo().await;
        repo.insert(with_children(employee(1, 101, "150000.00"))).await.unwrap();
        repo.insert(employee(2, 101, "90000.00")).await.unwrap();
        repo.insert(employee(3, 104, "100000.00")).await.unwrap();

        let managed: Vec<_> = repo
            .find_by_manager_id(101)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.employee_id)
            .collect();
        assert_eq!(managed, vec![1, 2]);
        assert!(repo.find_by_manager_id(103).await.unwrap().is_empty());

        let taxable = repo
            .find_by_salary_greater_than(Decimal::from(100_000))
            .await
            .unwrap();
        assert_eq!(taxable.len(), 1);
        assert_eq!(taxable[0].employee_id, 1);
        assert_eq!(taxable[0].phone_numbers.len(), 2);

        let missing: Vec<_> = repo
            .find_missing_voter_id()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.employee_id)
            .collect();
        assert_eq!(missing, vec![2, 3]);

        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }
}
