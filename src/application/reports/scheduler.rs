//! Background tasks that run the reports on fixed intervals.
//!
//! Each report has its own tokio interval loop. A failed run is logged and
//! the next tick runs as usual.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use super::missing_voter_id::MissingVoterIdReport;
use super::notifier::Notifier;
use super::taxable_salary::{TaxableSalaryReport, DEFAULT_TAXABLE_THRESHOLD};
use crate::domain::EmployeeRepository;
use crate::support::ShutdownSignal;

#[derive(Debug, Clone)]
pub struct ReportSchedule {
    pub taxable_interval: Duration,
    pub missing_voter_interval: Duration,
    pub taxable_threshold: Decimal,
}

impl Default for ReportSchedule {
    fn default() -> Self {
        Self {
            taxable_interval: Duration::from_secs(60),
            missing_voter_interval: Duration::from_secs(3600),
            taxable_threshold: DEFAULT_TAXABLE_THRESHOLD,
        }
    }
}

/// Spawn both report loops. They stop when `shutdown` fires.
pub fn start_report_tasks(
    repo: Arc<dyn EmployeeRepository>,
    notifier: Arc<dyn Notifier>,
    schedule: ReportSchedule,
    shutdown: ShutdownSignal,
) -> Vec<JoinHandle<()>> {
    let taxable = TaxableSalaryReport::new(
        repo.clone(),
        notifier.clone(),
        schedule.taxable_threshold,
    );
    let missing_voter = MissingVoterIdReport::new(repo, notifier);

    let taxable_task = {
        let shutdown = shutdown.clone();
        let period = schedule.taxable_interval;
        tokio::spawn(async move {
            info!(interval_secs = period.as_secs(), "Taxable salary report task started");
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = taxable.run().await {
                            warn!(error = %e, "Taxable salary report failed");
                        }
                    }
                    _ = shutdown.notified().wait() => break,
                }
            }
            info!("Taxable salary report task stopped");
        })
    };

    let missing_voter_task = {
        let period = schedule.missing_voter_interval;
        tokio::spawn(async move {
            info!(interval_secs = period.as_secs(), "Missing voter id report task started");
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = missing_voter.run().await {
                            warn!(error = %e, "Missing voter id report failed");
                        }
                    }
                    _ = shutdown.notified().wait() => break,
                }
            }
            info!("Missing voter id report task stopped");
        })
    };

    vec![taxable_task, missing_voter_task]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reports::notifier::testing::RecordingNotifier;
    use crate::domain::Employee;
    use crate::infrastructure::storage::InMemoryEmployeeRepository;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn tasks_run_on_start_and_stop_on_shutdown() {
        let repo = Arc::new(InMemoryEmployeeRepository::new());
        repo.insert(Employee::new(
            7,
            "Dana",
            NaiveDate::from_ymd_opt(1979, 9, 9).unwrap(),
            104,
            Decimal::from(200_000),
            "d@x.com",
        ))
        .await
        .unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let shutdown = ShutdownSignal::new();
        let schedule = ReportSchedule {
            taxable_interval: Duration::from_secs(3600),
            missing_voter_interval: Duration::from_secs(3600),
            ..Default::default()
        };
        let handles = start_report_tasks(repo, notifier.clone(), schedule, shutdown.clone());

        // First interval tick completes immediately.
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.trigger();
        for handle in handles {
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .expect("task should stop")
                .unwrap();
        }

        let messages = notifier.messages();
        assert!(messages.contains(&"Employee 7 - Dana: Your salary is now in taxable range".to_string()));
        // Once chained from the taxable run, once from its own loop.
        let missing = messages
            .iter()
            .filter(|m| m.as_str() == "Employee 7, Employee Name: Dana")
            .count();
        assert_eq!(missing, 2);
    }
}
