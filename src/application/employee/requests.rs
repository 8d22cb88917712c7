//! Create / update inputs for the employee aggregate.
//!
//! Every scalar is optional so that missing values surface as field
//! violations instead of deserialization failures.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::EmployeeFields;

/// One submitted phone entry. `phone_id` refers to an existing child on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneNumberEntry {
    pub phone_id: Option<i32>,
    pub phone_number: Option<String>,
    pub provider: Option<String>,
    pub phone_type: Option<String>,
}

impl PhoneNumberEntry {
    pub fn new(phone_number: &str, provider: &str, phone_type: &str) -> Self {
        Self {
            phone_id: None,
            phone_number: Some(phone_number.to_string()),
            provider: Some(provider.to_string()),
            phone_type: Some(phone_type.to_string()),
        }
    }

    pub fn with_id(mut self, phone_id: i32) -> Self {
        self.phone_id = Some(phone_id);
        self
    }

    pub(crate) fn has_number(&self) -> bool {
        self.phone_number.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// Submitted voter record. Identity fields are informational; the stored
/// row always belongs to the employee being written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoterIdEntry {
    pub voter_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub voter_number: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateEmployeeRequest {
    pub employee_id: Option<i32>,
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub manager_id: Option<i32>,
    pub salary: Option<Decimal>,
    pub email_id: Option<String>,
    pub phone_numbers: Vec<PhoneNumberEntry>,
    pub voter_id: Option<VoterIdEntry>,
}

impl CreateEmployeeRequest {
    pub fn fields(&self) -> EmployeeFields<'_> {
        EmployeeFields {
            name: self.name.as_deref(),
            dob: self.dob,
            manager_id: self.manager_id,
            salary: self.salary,
            email_id: self.email_id.as_deref(),
        }
    }
}

/// Full replacement of the scalar fields plus a phone/voter merge request.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub manager_id: Option<i32>,
    pub salary: Option<Decimal>,
    pub email_id: Option<String>,
    pub phone_numbers: Vec<PhoneNumberEntry>,
    pub voter_id: Option<VoterIdEntry>,
}

impl UpdateEmployeeRequest {
    pub fn fields(&self) -> EmployeeFields<'_> {
        EmployeeFields {
            name: self.name.as_deref(),
            dob: self.dob,
            manager_id: self.manager_id,
            salary: self.salary,
            email_id: self.email_id.as_deref(),
        }
    }
}
