//! Builds and merges employee aggregates from create / update requests.
//!
//! Pure in-memory work: the reconciler never touches storage. It hands the
//! service a fully assembled aggregate whose child collections are exactly
//! what must be persisted; the repository turns that into row diffs.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::requests::{CreateEmployeeRequest, PhoneNumberEntry, UpdateEmployeeRequest, VoterIdEntry};
use crate::domain::{
    DomainError, DomainResult, Employee, EmployeeFields, EmployeeValidator, PhoneNumber, VoterId,
};

/// What to do with an update entry whose `phone_id` matches no existing phone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPhonePolicy {
    /// Ignore the entry.
    #[default]
    Drop,
    /// Fail the update with `NotFound`.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateReconciler {
    validator: EmployeeValidator,
    unmatched_phone: UnmatchedPhonePolicy,
}

impl AggregateReconciler {
    pub fn new(validator: EmployeeValidator) -> Self {
        Self {
            validator,
            unmatched_phone: UnmatchedPhonePolicy::default(),
        }
    }

    pub fn with_unmatched_phone_policy(mut self, policy: UnmatchedPhonePolicy) -> Self {
        self.unmatched_phone = policy;
        self
    }

    /// Assemble a new aggregate: root, de-duplicated phones, optional voter record.
    pub fn build_new(
        &self,
        request: CreateEmployeeRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Employee> {
        let fields = request.fields();
        let violations = self.validator.validate_new(request.employee_id, &fields);
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }
        let employee_id = request
            .employee_id
            .ok_or_else(|| missing_after_validation("employeeId"))?;

        let mut employee = root_from_fields(employee_id, &fields, now)?;

        for entry in request.phone_numbers {
            // Ids sent on create are ignored; new rows always get fresh ids.
            let phone = new_phone(entry);
            if !employee.add_phone_number(phone) {
                debug!(employee_id, "Dropping duplicate phone entry");
            }
        }

        employee.set_voter_id(request.voter_id.map(new_voter));
        Ok(employee)
    }

    /// Apply an update request to a loaded aggregate.
    ///
    /// Scalars are overwritten; the phone collection becomes exactly the
    /// matched-and-updated children plus the new ones; the voter record is
    /// always replaced by a fresh one built from the request.
    pub fn merge_update(
        &self,
        mut employee: Employee,
        request: UpdateEmployeeRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Employee> {
        let fields = request.fields();
        let violations = self.validator.validate(&fields);
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        let scalars = root_from_fields(employee.employee_id, &fields, now)?;
        employee.name = scalars.name;
        employee.dob = scalars.dob;
        employee.manager_id = scalars.manager_id;
        employee.salary = scalars.salary;
        employee.email_id = scalars.email_id;

        let existing = std::mem::take(&mut employee.phone_numbers);
        let mut matched: HashSet<i32> = HashSet::new();

        for entry in request.phone_numbers {
            match entry.phone_id {
                Some(phone_id) => {
                    let current = existing
                        .iter()
                        .find(|p| p.phone_id == Some(phone_id) && !matched.contains(&phone_id));
                    let Some(current) = current else {
                        self.on_unmatched_phone(employee.employee_id, phone_id)?;
                        continue;
                    };
                    matched.insert(phone_id);
                    let mut updated = current.clone();
                    updated.phone_number = entry.phone_number.unwrap_or_default();
                    updated.provider = entry.provider.unwrap_or_default();
                    updated.phone_type = entry.phone_type.unwrap_or_default();
                    if !employee.add_phone_number(updated) {
                        debug!(employee_id = employee.employee_id, phone_id, "Updated phone duplicates another entry, dropping");
                    }
                }
                None if entry.has_number() => {
                    if !employee.add_phone_number(new_phone(entry)) {
                        debug!(employee_id = employee.employee_id, "Dropping duplicate phone entry");
                    }
                }
                None => {}
            }
        }

        employee.set_voter_id(Some(new_voter(request.voter_id.unwrap_or_default())));
        employee.updated_at = strictly_after(employee.updated_at, now);
        Ok(employee)
    }

    fn on_unmatched_phone(&self, employee_id: i32, phone_id: i32) -> DomainResult<()> {
        match self.unmatched_phone {
            UnmatchedPhonePolicy::Drop => {
                debug!(employee_id, phone_id, "Ignoring phone entry with unknown id");
                Ok(())
            }
            UnmatchedPhonePolicy::Reject => Err(DomainError::NotFound {
                entity: "PhoneNumber",
                field: "phone_id",
                value: phone_id.to_string(),
            }),
        }
    }
}

fn missing_after_validation(field: &str) -> DomainError {
    DomainError::Unexpected(format!("{} missing after validation", field))
}

fn root_from_fields(
    employee_id: i32,
    fields: &EmployeeFields<'_>,
    now: DateTime<Utc>,
) -> DomainResult<Employee> {
    let name = fields.name.ok_or_else(|| missing_after_validation("name"))?;
    let dob = fields.dob.ok_or_else(|| missing_after_validation("dob"))?;
    let manager_id = fields
        .manager_id
        .ok_or_else(|| missing_after_validation("managerId"))?;
    let salary = fields
        .salary
        .ok_or_else(|| missing_after_validation("salary"))?;
    let email_id = fields
        .email_id
        .ok_or_else(|| missing_after_validation("emailId"))?;

    let mut employee = Employee::new(employee_id, name, dob, manager_id, salary, email_id);
    employee.created_at = now;
    employee.updated_at = now;
    Ok(employee)
}

fn new_phone(entry: PhoneNumberEntry) -> PhoneNumber {
    PhoneNumber::new(
        entry.phone_number.unwrap_or_default(),
        entry.provider.unwrap_or_default(),
        entry.phone_type.unwrap_or_default(),
    )
}

fn new_voter(entry: VoterIdEntry) -> VoterId {
    VoterId {
        voter_id: None,
        employee_id: 0,
        voter_number: entry.voter_number,
        city: entry.city,
    }
}

/// `now`, nudged forward when the clock has not advanced past `previous`.
fn strictly_after(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
