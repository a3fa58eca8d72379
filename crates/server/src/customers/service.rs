use std::sync::Arc;

use clientes_core::domain::customer::{Customer, CustomerId};
use clientes_db::repositories::{
    CustomerRepository, CustomerScan, RepositoryError, SqlCustomerRepository, SqlCustomerScan,
};
use clientes_db::DbPool;
use tracing::info;

/// Store access for the customer routes. Every call emits one `customer.store.*` event.
#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    scan: Arc<dyn CustomerScan>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>, scan: Arc<dyn CustomerScan>) -> Self {
        Self { repository, scan }
    }

    pub fn sqlite(pool: DbPool) -> Self {
        Self::new(
            Arc::new(SqlCustomerRepository::new(pool.clone())),
            Arc::new(SqlCustomerScan::new(pool)),
        )
    }

    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        info!(event_name = "customer.store.find_by_id", customer_id = %id, "looking up customer");
        self.repository.find_by_id(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError> {
        info!(event_name = "customer.store.find_by_name", name = %name, "looking up customer");
        self.repository.find_by_name(name).await
    }

    pub async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, RepositoryError> {
        info!(event_name = "customer.store.find_by_tax_id", tax_id = %tax_id, "looking up customer");
        self.repository.find_by_tax_id(tax_id).await
    }

    pub async fn find_by_tax_id_prefix(
        &self,
        prefix: &str,
        preferred: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        info!(
            event_name = "customer.store.find_by_tax_id_prefix",
            tax_id_prefix = %prefix,
            preferred_id = %preferred,
            "looking up customer by tax id prefix"
        );
        self.repository.find_by_tax_id_prefix(prefix, preferred).await
    }

    pub async fn find_by_name_and_tax_id(
        &self,
        name: &str,
        tax_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        info!(
            event_name = "customer.store.find_by_name_and_tax_id",
            name = %name,
            tax_id = %tax_id,
            "looking up customer by name and tax id"
        );
        self.repository.find_by_name_and_tax_id(name, tax_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        info!(event_name = "customer.store.find_all", "listing customers");
        self.repository.find_all().await
    }

    pub async fn list_all_raw(&self) -> Result<Vec<Customer>, RepositoryError> {
        info!(event_name = "customer.store.scan_all", "scanning customers table");
        self.scan.scan_all().await
    }

    pub async fn save(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        info!(
            event_name = "customer.store.save",
            customer_id = %customer.id,
            tax_id = %customer.tax_id,
            "saving customer"
        );
        self.repository.save(customer).await
    }

    pub async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        info!(event_name = "customer.store.delete", customer_id = %id, "deleting customer");
        self.repository.delete(id).await
    }
}
