pub mod employee;
pub mod reports;

pub use employee::{
    AggregateReconciler, CreateEmployeeRequest, EmployeeService, PhoneNumberEntry,
    UnmatchedPhonePolicy, UpdateEmployeeRequest, VoterIdEntry,
};
pub use reports::{
    start_report_tasks, LogNotifier, MissingVoterIdReport, Notifier, ReportSchedule,
    TaxableSalaryReport,
};
