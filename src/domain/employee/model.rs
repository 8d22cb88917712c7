//! Employee aggregate entities

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Phone number owned by an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    /// Storage identity, `None` until persisted
    pub phone_id: Option<i32>,
    /// Back-reference to the owning employee
    pub employee_id: i32,
    pub phone_number: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub phone_type: String,
}

impl PhoneNumber {
    pub fn new(
        phone_number: impl Into<String>,
        provider: impl Into<String>,
        phone_type: impl Into<String>,
    ) -> Self {
        Self {
            phone_id: None,
            employee_id: 0,
            phone_number: phone_number.into(),
            provider: provider.into(),
            phone_type: phone_type.into(),
        }
    }

    /// Two phones are the same entry when number, provider and type all match.
    pub fn same_entry(&self, other: &PhoneNumber) -> bool {
        self.phone_number == other.phone_number
            && self.provider == other.provider
            && self.phone_type == other.phone_type
    }
}

/// Voter identity record, at most one per employee
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterId {
    /// Storage identity, `None` until persisted
    pub voter_id: Option<i32>,
    pub employee_id: i32,
    pub voter_number: Option<String>,
    pub city: Option<String>,
}

/// Employee aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Caller-supplied identity
    pub employee_id: i32,
    pub name: String,
    pub dob: NaiveDate,
    pub manager_id: i32,
    pub salary: Decimal,
    pub email_id: String,
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(rename = "voterID")]
    pub voter_id: Option<VoterId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(
        employee_id: i32,
        name: impl Into<String>,
        dob: NaiveDate,
        manager_id: i32,
        salary: Decimal,
        email_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            employee_id,
            name: name.into(),
            dob,
            manager_id,
            salary,
            email_id: email_id.into(),
            phone_numbers: Vec::new(),
            voter_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains_phone_number(&self, phone: &PhoneNumber) -> bool {
        self.phone_numbers.iter().any(|p| p.same_entry(phone))
    }

    /// Attach a phone to this employee.
    ///
    /// Returns `false` and drops the phone when an entry with the same
    /// number, provider and type is already attached.
    pub fn add_phone_number(&mut self, mut phone: PhoneNumber) -> bool {
        if self.contains_phone_number(&phone) {
            return false;
        }
        phone.employee_id = self.employee_id;
        self.phone_numbers.push(phone);
        true
    }

    /// Replace the voter record, re-pointing its back-reference at this employee.
    pub fn set_voter_id(&mut self, voter: Option<VoterId>) {
        self.voter_id = voter.map(|mut v| {
            v.employee_id = self.employee_id;
            v
        });
    }

    pub fn has_voter_id(&self) -> bool {
        self.voter_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Employee {
        Employee::new(
            1,
            "Alice",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            101,
            Decimal::new(5_000_000, 2),
            "a@x.com",
        )
    }

    #[test]
    fn duplicate_phone_is_dropped() {
        let mut e = alice();
        assert!(e.add_phone_number(PhoneNumber::new("555", "X", "mobile")));
        assert!(!e.add_phone_number(PhoneNumber::new("555", "X", "mobile")));
        assert_eq!(e.phone_numbers.len(), 1);
    }

    #[test]
    fn phones_differing_in_type_are_kept() {
        let mut e = alice();
        e.add_phone_number(PhoneNumber::new("555", "X", "mobile"));
        e.add_phone_number(PhoneNumber::new("555", "X", "home"));
        assert_eq!(e.phone_numbers.len(), 2);
    }

    #[test]
    fn attached_children_point_at_root() {
        let mut e = alice();
        e.add_phone_number(PhoneNumber::new("555", "X", "mobile"));
        e.set_voter_id(Some(VoterId {
            employee_id: 99,
            voter_number: Some("V-1".into()),
            ..Default::default()
        }));
        assert_eq!(e.phone_numbers[0].employee_id, 1);
        assert_eq!(e.voter_id.as_ref().unwrap().employee_id, 1);
    }

    #[test]
    fn phone_type_serializes_as_type() {
        let json = serde_json::to_value(PhoneNumber::new("555", "X", "mobile")).unwrap();
        assert_eq!(json["type"], "mobile");
        assert_eq!(json["phoneNumber"], "555");
    }
}
