//! Employees whose salary crossed the taxable threshold.
//!
//! A run is always followed by the missing voter id report.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::missing_voter_id::MissingVoterIdReport;
use super::notifier::Notifier;
use crate::domain::{DomainResult, Employee, EmployeeRepository};

pub const REPORT_NAME: &str = "taxable_salary";

pub const DEFAULT_TAXABLE_THRESHOLD: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

pub fn taxable_salary_message(employee: &Employee) -> String {
    format!(
        "Employee {} - {}: Your salary is now in taxable range",
        employee.employee_id, employee.name
    )
}

pub struct TaxableSalaryReport {
    repo: Arc<dyn EmployeeRepository>,
    notifier: Arc<dyn Notifier>,
    threshold: Decimal,
    missing_voter_id: MissingVoterIdReport,
}

impl TaxableSalaryReport {
    pub fn new(
        repo: Arc<dyn EmployeeRepository>,
        notifier: Arc<dyn Notifier>,
        threshold: Decimal,
    ) -> Self {
        let missing_voter_id = MissingVoterIdReport::new(repo.clone(), notifier.clone());
        Self {
            repo,
            notifier,
            threshold,
            missing_voter_id,
        }
    }

    /// Notify every employee earning strictly more than the threshold, then
    /// run the missing voter id report. Returns the total message count.
    pub async fn run(&self) -> DomainResult<usize> {
        let employees = self.repo.find_by_salary_greater_than(self.threshold).await?;
        debug!(count = employees.len(), threshold = %self.threshold, "Taxable salary report");

        for employee in &employees {
            self.notifier.notify(&taxable_salary_message(employee));
        }
        metrics::counter!("report_notifications_total", "report" => REPORT_NAME)
            .increment(employees.len() as u64);

        let chained = self.missing_voter_id.run().await?;
        Ok(employees.len() + chained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reports::notifier::testing::RecordingNotifier;
    use crate::domain::VoterId;
    use crate::infrastructure::storage::InMemoryEmployeeRepository;
    use chrono::NaiveDate;

    fn employee(id: i32, name: &str, salary: i64) -> Employee {
        let mut e = Employee::new(
            id,
            name,
            NaiveDate::from_ymd_opt(1980, 3, 14).unwrap(),
            102,
            Decimal::from(salary),
            "e@x.com",
        );
        e.set_voter_id(Some(VoterId::default()));
        e
    }

    #[tokio::test]
    async fn one_notification_for_salary_above_threshold() {
        let repo = Arc::new(InMemoryEmployeeRepository::new());
        repo.insert(employee(1, "Rich", 150_000)).await.unwrap();
        repo.insert(employee(2, "Modest", 90_000)).await.unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let report = TaxableSalaryReport::new(repo, notifier.clone(), DEFAULT_TAXABLE_THRESHOLD);

        assert_eq!(report.run().await.unwrap(), 1);
        assert_eq!(
            notifier.messages(),
            vec!["Employee 1 - Rich: Your salary is now in taxable range"]
        );
    }

    #[tokio::test]
    async fn threshold_is_exclusive() {
        let repo = Arc::new(InMemoryEmployeeRepository::new());
        repo.insert(employee(1, "Edge", 100_000)).await.unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let report = TaxableSalaryReport::new(repo, notifier.clone(), DEFAULT_TAXABLE_THRESHOLD);

        assert_eq!(report.run().await.unwrap(), 0);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn missing_voter_report_runs_after_taxable() {
        let repo = Arc::new(InMemoryEmployeeRepository::new());
        let mut no_voter = employee(3, "Carol", 120_000);
        no_voter.set_voter_id(None);
        repo.insert(no_voter).await.unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let report = TaxableSalaryReport::new(repo, notifier.clone(), DEFAULT_TAXABLE_THRESHOLD);

        assert_eq!(report.run().await.unwrap(), 2);
        assert_eq!(
            notifier.messages(),
            vec![
                "Employee 3 - Carol: Your salary is now in taxable range",
                "Employee 3, Employee Name: Carol",
            ]
        );
    }
}
