//! Employee module: create, read, update and delete employee aggregates

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
