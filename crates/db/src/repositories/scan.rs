use sqlx::Row;

use clientes_core::domain::customer::{Customer, CustomerId};

use super::{CustomerScan, RepositoryError};
use crate::DbPool;

/// Plain SQL full-table read, mapped column by column.
pub struct SqlCustomerScan {
    pool: DbPool,
}

impl SqlCustomerScan {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let tax_id: String =
        row.try_get("tax_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Customer { id: CustomerId(id), name, tax_id })
}

#[async_trait::async_trait]
impl CustomerScan for SqlCustomerScan {
    async fn scan_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> =
            sqlx::query("SELECT id, name, tax_id FROM customers").fetch_all(&self.pool).await?;

        rows.iter().map(row_to_customer).collect::<Result<Vec<_>, _>>()
    }
}
