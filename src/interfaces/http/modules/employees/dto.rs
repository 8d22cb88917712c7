//! Employee DTOs
//!
//! JSON field names follow the public contract: camelCase, `voterID` for
//! the voter record and `type` for the phone kind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::application::{CreateEmployeeRequest, PhoneNumberEntry, UpdateEmployeeRequest, VoterIdEntry};
use crate::domain::{Employee, EmployeeFields, EmployeeValidator, PhoneNumber, VoterId};
use crate::interfaces::http::common::validated_json::violations_to_errors;

// ── Requests ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberInput {
    /// Existing phone to update (update requests only)
    pub phone_id: Option<i32>,
    #[schema(example = "555-0100")]
    pub phone_number: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "mobile")]
    pub phone_type: Option<String>,
}

impl From<PhoneNumberInput> for PhoneNumberEntry {
    fn from(p: PhoneNumberInput) -> Self {
        Self {
            phone_id: p.phone_id,
            phone_number: p.phone_number,
            provider: p.provider,
            phone_type: p.phone_type,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoterIdInput {
    pub voter_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub voter_number: Option<String>,
    pub city: Option<String>,
}

impl From<VoterIdInput> for VoterIdEntry {
    fn from(v: VoterIdInput) -> Self {
        Self {
            voter_id: v.voter_id,
            employee_id: v.employee_id,
            voter_number: v.voter_number,
            city: v.city,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeBody {
    #[schema(example = 1)]
    pub employee_id: Option<i32>,
    #[schema(example = "Alice")]
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1990-01-01")]
    pub dob: Option<NaiveDate>,
    #[schema(example = 101)]
    pub manager_id: Option<i32>,
    #[schema(value_type = Option<f64>, example = 50000.00)]
    pub salary: Option<Decimal>,
    #[schema(example = "alice@example.com")]
    pub email_id: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumberInput>,
    #[serde(rename = "voterID")]
    pub voter_id: Option<VoterIdInput>,
}

impl CreateEmployeeBody {
    fn fields(&self) -> EmployeeFields<'_> {
        EmployeeFields {
            name: self.name.as_deref(),
            dob: self.dob,
            manager_id: self.manager_id,
            salary: self.salary,
            email_id: self.email_id.as_deref(),
        }
    }
}

impl Validate for CreateEmployeeBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        violations_to_errors(EmployeeValidator::new().validate_new(self.employee_id, &self.fields()))
    }
}

impl From<CreateEmployeeBody> for CreateEmployeeRequest {
    fn from(b: CreateEmployeeBody) -> Self {
        Self {
            employee_id: b.employee_id,
            name: b.name,
            dob: b.dob,
            manager_id: b.manager_id,
            salary: b.salary,
            email_id: b.email_id,
            phone_numbers: b.phone_numbers.into_iter().map(Into::into).collect(),
            voter_id: b.voter_id.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeBody {
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub dob: Option<NaiveDate>,
    pub manager_id: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub salary: Option<Decimal>,
    pub email_id: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumberInput>,
    #[serde(rename = "voterID")]
    pub voter_id: Option<VoterIdInput>,
}

impl UpdateEmployeeBody {
    fn fields(&self) -> EmployeeFields<'_> {
        EmployeeFields {
            name: self.name.as_deref(),
            dob: self.dob,
            manager_id: self.manager_id,
            salary: self.salary,
            email_id: self.email_id.as_deref(),
        }
    }
}

impl Validate for UpdateEmployeeBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        violations_to_errors(EmployeeValidator::new().validate(&self.fields()))
    }
}

impl From<UpdateEmployeeBody> for UpdateEmployeeRequest {
    fn from(b: UpdateEmployeeBody) -> Self {
        Self {
            name: b.name,
            dob: b.dob,
            manager_id: b.manager_id,
            salary: b.salary,
            email_id: b.email_id,
            phone_numbers: b.phone_numbers.into_iter().map(Into::into).collect(),
            voter_id: b.voter_id.map(Into::into),
        }
    }
}

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberDto {
    pub phone_id: Option<i32>,
    pub phone_number: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub phone_type: String,
}

impl From<PhoneNumber> for PhoneNumberDto {
    fn from(p: PhoneNumber) -> Self {
        Self {
            phone_id: p.phone_id,
            phone_number: p.phone_number,
            provider: p.provider,
            phone_type: p.phone_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoterIdDto {
    pub voter_id: Option<i32>,
    pub employee_id: i32,
    pub voter_number: Option<String>,
    pub city: Option<String>,
}

impl From<VoterId> for VoterIdDto {
    fn from(v: VoterId) -> Self {
        Self {
            voter_id: v.voter_id,
            employee_id: v.employee_id,
            voter_number: v.voter_number,
            city: v.city,
        }
    }
}

/// Full employee aggregate as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub employee_id: i32,
    pub name: String,
    #[schema(value_type = String, format = Date)]
    pub dob: NaiveDate,
    pub manager_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub salary: Decimal,
    pub email_id: String,
    pub phone_numbers: Vec<PhoneNumberDto>,
    #[serde(rename = "voterID")]
    pub voter_id: Option<VoterIdDto>,
    pub created_date_time: DateTime<Utc>,
    pub updated_date_time: DateTime<Utc>,
}

impl From<Employee> for EmployeeDto {
    fn from(e: Employee) -> Self {
        Self {
            employee_id: e.employee_id,
            name: e.name,
            dob: e.dob,
            manager_id: e.manager_id,
            salary: e.salary,
            email_id: e.email_id,
            phone_numbers: e.phone_numbers.into_iter().map(Into::into).collect(),
            voter_id: e.voter_id.map(Into::into),
            created_date_time: e.created_at,
            updated_date_time: e.updated_at,
        }
    }
}
