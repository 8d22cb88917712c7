//! Employees that have no voter record on file.

use std::sync::Arc;

use tracing::debug;

use super::notifier::Notifier;
use crate::domain::{DomainResult, Employee, EmployeeRepository};

pub const REPORT_NAME: &str = "missing_voter_id";

pub fn missing_voter_id_message(employee: &Employee) -> String {
    format!(
        "Employee {}, Employee Name: {}",
        employee.employee_id, employee.name
    )
}

#[derive(Clone)]
pub struct MissingVoterIdReport {
    repo: Arc<dyn EmployeeRepository>,
    notifier: Arc<dyn Notifier>,
}

impl MissingVoterIdReport {
    pub fn new(repo: Arc<dyn EmployeeRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    /// Notify once per employee without a voter record. Returns the count.
    pub async fn run(&self) -> DomainResult<usize> {
        let employees = self.repo.find_missing_voter_id().await?;
        debug!(count = employees.len(), "Missing voter id report");

        for employee in &employees {
            self.notifier.notify(&missing_voter_id_message(employee));
        }
        metrics::counter!("report_notifications_total", "report" => REPORT_NAME)
            .increment(employees.len() as u64);
        Ok(employees.len())
    }
}
