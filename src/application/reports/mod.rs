//! Periodic batch reports over the employee store

pub mod missing_voter_id;
pub mod notifier;
pub mod scheduler;
pub mod taxable_salary;

pub use missing_voter_id::MissingVoterIdReport;
pub use notifier::{LogNotifier, Notifier};
pub use scheduler::{start_report_tasks, ReportSchedule};
pub use taxable_salary::{TaxableSalaryReport, DEFAULT_TAXABLE_THRESHOLD};
