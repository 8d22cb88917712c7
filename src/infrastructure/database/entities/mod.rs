//! Database entities module

pub mod employee;
pub mod phone_number;
pub mod voter_id;

pub use employee::Entity as Employee;
pub use phone_number::Entity as PhoneNumber;
pub use voter_id::Entity as VoterId;
