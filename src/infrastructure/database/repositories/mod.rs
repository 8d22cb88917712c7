//! Database repository implementations

pub mod employee_repository;

pub use employee_repository::SeaOrmEmployeeRepository;
