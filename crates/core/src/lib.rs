pub mod config;
pub mod domain;
pub mod envelope;
pub mod errors;
pub mod security;
pub mod validation;

pub use domain::customer::{Customer, CustomerDto, CustomerId, MaintainIntent};
pub use envelope::Envelope;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use security::{CredentialStore, Principal};
pub use validation::{CustomerViolation, ExistingMatches, LookupPlan};
