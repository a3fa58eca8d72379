use std::collections::BTreeMap;

use tokio::sync::RwLock;

use clientes_core::domain::customer::{Customer, CustomerId};

use super::{CustomerRepository, CustomerScan, RepositoryError};

#[derive(Default)]
struct CustomerTable {
    rows: BTreeMap<i64, Customer>,
    last_id: i64,
}

impl CustomerTable {
    fn first_where(&self, predicate: impl Fn(&Customer) -> bool) -> Option<Customer> {
        self.rows.values().find(|customer| predicate(customer)).cloned()
    }
}

/// Map-backed store with the same lookup semantics as the SQL repository.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    table: RwLock<CustomerTable>,
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id.0).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.first_where(|customer| customer.name == name))
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.first_where(|customer| customer.tax_id == tax_id))
    }

    async fn find_by_tax_id_prefix(
        &self,
        prefix: &str,
        preferred: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        let table = self.table.read().await;
        let matches = |customer: &Customer| customer.tax_id.starts_with(prefix);

        let own = table.rows.get(&preferred.0).filter(|customer| matches(*customer)).cloned();
        Ok(own.or_else(|| table.first_where(matches)))
    }

    async fn find_by_name_and_tax_id(
        &self,
        name: &str,
        tax_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.first_where(|customer| customer.name == name && customer.tax_id == tax_id))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn save(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        let mut table = self.table.write().await;
        let id = if customer.id.is_unassigned() { table.last_id + 1 } else { customer.id.0 };
        table.last_id = table.last_id.max(id);

        let saved = Customer { id: CustomerId(id), ..customer };
        table.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id.0).is_some())
    }
}

#[async_trait::async_trait]
impl CustomerScan for InMemoryCustomerRepository {
    async fn scan_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        self.find_all().await
    }
}
