use async_trait::async_trait;
use thiserror::Error;

use clientes_core::domain::customer::{Customer, CustomerId};

pub mod customer;
pub mod memory;
pub mod scan;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryCustomerRepository;
pub use scan::SqlCustomerScan;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Record store for customers.
///
/// `find_by_tax_id` is an exact match; `find_by_tax_id_prefix` matches any
/// stored tax id that starts with the given value and backs the uniqueness
/// check. Lookups that can hit several rows return the lowest id, except that
/// the prefix lookup returns the `preferred` row first when it matches.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_tax_id_prefix(
        &self,
        prefix: &str,
        preferred: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_name_and_tax_id(
        &self,
        name: &str,
        tax_id: &str,
    ) -> Result<Option<Customer>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Inserts when the id is unassigned, otherwise overwrites the row with that id.
    async fn save(&self, customer: Customer) -> Result<Customer, RepositoryError>;

    /// Returns `false` when no row had the id.
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError>;
}

/// Full-table read that bypasses [`CustomerRepository`].
#[async_trait]
pub trait CustomerScan: Send + Sync {
    async fn scan_all(&self) -> Result<Vec<Customer>, RepositoryError>;
}
