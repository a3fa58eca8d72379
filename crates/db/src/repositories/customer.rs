use clientes_core::domain::customer::{Customer, CustomerId};

use super::{CustomerRepository, RepositoryError};
use crate::DbPool;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    tax_id: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self { id: CustomerId(row.id), name: row.name, tax_id: row.tax_id }
    }
}

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO customers (name, tax_id) VALUES (?, ?) RETURNING id")
                .bind(&customer.name)
                .bind(&customer.tax_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(Customer { id: CustomerId(id), ..customer })
    }

    async fn upsert(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        sqlx::query(
            "INSERT INTO customers (id, name, tax_id)
             VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 tax_id = excluded.tax_id",
        )
        .bind(customer.id.0)
        .bind(&customer.name)
        .bind(&customer.tax_id)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, tax_id FROM customers WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, tax_id FROM customers WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, tax_id FROM customers WHERE tax_id = ? ORDER BY id LIMIT 1",
        )
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_tax_id_prefix(
        &self,
        prefix: &str,
        preferred: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        // substr keeps the comparison case-sensitive and free of LIKE wildcards.
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, tax_id FROM customers
             WHERE substr(tax_id, 1, length(?1)) = ?1
             ORDER BY id = ?2 DESC, id LIMIT 1",
        )
        .bind(prefix)
        .bind(preferred.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_name_and_tax_id(
        &self,
        name: &str,
        tax_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, tax_id FROM customers
             WHERE name = ? AND tax_id = ?
             ORDER BY id LIMIT 1",
        )
        .bind(name)
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, tax_id FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn save(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        if customer.id.is_unassigned() {
            self.insert(customer).await
        } else {
            self.upsert(customer).await
        }
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
