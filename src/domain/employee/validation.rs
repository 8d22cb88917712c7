//! Field rules for employee data
//!
//! Rules are evaluated eagerly and every failure is reported; a missing
//! value only fails its presence rule, the remaining rules for that field
//! are skipped.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::ValidateEmail;

use crate::support::errors::Violation;

pub const MANAGER_ID_MIN: i32 = 101;
pub const MANAGER_ID_MAX: i32 = 105;
pub const NAME_MAX_CHARS: usize = 100;
pub const SALARY_INTEGER_DIGITS: u32 = 6;
pub const SALARY_FRACTION_DIGITS: u32 = 2;

/// Borrowed view of the scalar employee fields, as submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeFields<'a> {
    pub name: Option<&'a str>,
    pub dob: Option<NaiveDate>,
    pub manager_id: Option<i32>,
    pub salary: Option<Decimal>,
    pub email_id: Option<&'a str>,
}

struct Rule {
    field: &'static str,
    message: &'static str,
    check: fn(&EmployeeFields<'_>) -> bool,
}

const NOT_NULL: &str = "must not be null";
const NOT_BLANK: &str = "must not be blank";

const RULES: &[Rule] = &[
    Rule {
        field: "name",
        message: NOT_BLANK,
        check: |f| f.name.is_some_and(|n| !n.trim().is_empty()),
    },
    Rule {
        field: "name",
        message: "size must be between 1 and 100",
        check: |f| {
            f.name
                .map_or(true, |n| (1..=NAME_MAX_CHARS).contains(&n.chars().count()))
        },
    },
    Rule {
        field: "name",
        message: "Only letters are allowed for name",
        check: |f| {
            f.name
                .map_or(true, |n| !n.is_empty() && n.chars().all(|c| c.is_ascii_alphabetic()))
        },
    },
    Rule {
        field: "dob",
        message: NOT_NULL,
        check: |f| f.dob.is_some(),
    },
    Rule {
        field: "managerId",
        message: NOT_NULL,
        check: |f| f.manager_id.is_some(),
    },
    Rule {
        field: "managerId",
        message: "Manager ID should be between 101 and 105",
        check: |f| {
            f.manager_id
                .map_or(true, |id| (MANAGER_ID_MIN..=MANAGER_ID_MAX).contains(&id))
        },
    },
    Rule {
        field: "salary",
        message: NOT_NULL,
        check: |f| f.salary.is_some(),
    },
    Rule {
        field: "salary",
        message: "Salary should be greater than 0",
        check: |f| f.salary.map_or(true, |s| s > Decimal::ZERO),
    },
    Rule {
        field: "salary",
        message: "Salary should have at most 6 digits and 2 decimal places",
        check: |f| f.salary.map_or(true, salary_digits_ok),
    },
    Rule {
        field: "emailId",
        message: NOT_BLANK,
        check: |f| f.email_id.is_some_and(|e| !e.trim().is_empty()),
    },
    Rule {
        field: "emailId",
        message: "Please provide a valid email address",
        check: |f| {
            f.email_id
                .map_or(true, |e| e.trim().is_empty() || e.validate_email())
        },
    },
];

fn salary_digits_ok(salary: Decimal) -> bool {
    let normalized = salary.normalize();
    if normalized.scale() > SALARY_FRACTION_DIGITS {
        return false;
    }
    let integer_part = normalized.abs().trunc();
    integer_part.is_zero() || integer_part.to_string().len() as u32 <= SALARY_INTEGER_DIGITS
}

/// Stateless validator for employee data.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeValidator;

impl EmployeeValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check the scalar fields, returning every failed rule in rule order.
    pub fn validate(&self, fields: &EmployeeFields<'_>) -> Vec<Violation> {
        RULES
            .iter()
            .filter(|rule| !(rule.check)(fields))
            .map(|rule| Violation::new(rule.field, rule.message))
            .collect()
    }

    /// Same as [`validate`](Self::validate), plus the caller-supplied identity
    /// a new employee must carry.
    pub fn validate_new(
        &self,
        employee_id: Option<i32>,
        fields: &EmployeeFields<'_>,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        if employee_id.is_none() {
            violations.push(Violation::new("employeeId", NOT_NULL));
        }
        violations.extend(self.validate(fields));
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn valid_fields() -> EmployeeFields<'static> {
        EmployeeFields {
            name: Some("Alice"),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1),
            manager_id: Some(101),
            salary: Some(Decimal::from_str("50000.00").unwrap()),
            email_id: Some("a@x.com"),
        }
    }

    fn fields_failing(violations: &[Violation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn valid_employee_passes() {
        assert!(EmployeeValidator::new().validate(&valid_fields()).is_empty());
    }

    #[test]
    fn seven_integer_digits_fail_digits_rule() {
        let fields = EmployeeFields {
            salary: Some(Decimal::from_str("1000000.00").unwrap()),
            ..valid_fields()
        };
        let violations = EmployeeValidator::new().validate(&fields);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "salary");
        assert_eq!(
            violations[0].message,
            "Salary should have at most 6 digits and 2 decimal places"
        );
    }

    #[test]
    fn six_integer_digits_pass() {
        let fields = EmployeeFields {
            salary: Some(Decimal::from_str("100000.00").unwrap()),
            ..valid_fields()
        };
        assert!(EmployeeValidator::new().validate(&fields).is_empty());
    }

    #[test]
    fn three_fraction_digits_fail() {
        let fields = EmployeeFields {
            salary: Some(Decimal::from_str("10.125").unwrap()),
            ..valid_fields()
        };
        let violations = EmployeeValidator::new().validate(&fields);
        assert_eq!(fields_failing(&violations), vec!["salary"]);
    }

    #[test]
    fn trailing_zero_fraction_digits_are_ignored() {
        let fields = EmployeeFields {
            salary: Some(Decimal::from_str("10.5000").unwrap()),
            ..valid_fields()
        };
        assert!(EmployeeValidator::new().validate(&fields).is_empty());
    }

    #[test]
    fn zero_salary_fails_minimum() {
        let fields = EmployeeFields {
            salary: Some(Decimal::ZERO),
            ..valid_fields()
        };
        let violations = EmployeeValidator::new().validate(&fields);
        assert_eq!(violations[0].message, "Salary should be greater than 0");
    }

    #[test]
    fn manager_id_bounds_are_inclusive() {
        let validator = EmployeeValidator::new();
        for (id, ok) in [(100, false), (101, true), (105, true), (106, false)] {
            let fields = EmployeeFields {
                manager_id: Some(id),
                ..valid_fields()
            };
            assert_eq!(validator.validate(&fields).is_empty(), ok, "manager {}", id);
        }
    }

    #[test]
    fn name_with_digits_fails_letters_rule() {
        let fields = EmployeeFields {
            name: Some("Alice2"),
            ..valid_fields()
        };
        let violations = EmployeeValidator::new().validate(&fields);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Only letters are allowed for name");
    }

    #[test]
    fn overlong_name_fails_size_rule() {
        let long = "a".repeat(101);
        let fields = EmployeeFields {
            name: Some(&long),
            ..valid_fields()
        };
        let violations = EmployeeValidator::new().validate(&fields);
        assert_eq!(violations[0].message, "size must be between 1 and 100");
    }

    #[test]
    fn all_failures_are_aggregated() {
        let fields = EmployeeFields {
            name: Some("B0b"),
            dob: None,
            manager_id: Some(7),
            salary: None,
            email_id: Some("not-an-email"),
        };
        let violations = EmployeeValidator::new().validate(&fields);
        assert_eq!(
            fields_failing(&violations),
            vec!["name", "dob", "managerId", "salary", "emailId"]
        );
    }

    #[test]
    fn missing_identity_is_reported_first() {
        let violations = EmployeeValidator::new().validate_new(None, &valid_fields());
        assert_eq!(violations, vec![Violation::new("employeeId", "must not be null")]);
    }

    #[test]
    fn blank_email_reports_only_blank() {
        let fields = EmployeeFields {
            email_id: Some("  "),
            ..valid_fields()
        };
        let violations = EmployeeValidator::new().validate(&fields);
        assert_eq!(violations, vec![Violation::new("emailId", "must not be blank")]);
    }
}
