pub mod errors;
pub mod shutdown;

pub use errors::{DomainError, DomainResult, Violation};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
