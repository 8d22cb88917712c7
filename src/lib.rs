//! # Employee Registry
//!
//! CRUD backend for employee records, each owning a list of phone numbers
//! and an optional voter record.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: The employee aggregate, validation rules and the repository contract
//! - **application**: Aggregate reconciliation, the employee service and periodic reports
//! - **infrastructure**: SeaORM persistence, migrations and an in-memory repository
//! - **interfaces**: REST API with Swagger documentation and Prometheus metrics
//! - **server**: Runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
