use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Demo customers loaded by `clientes seed`, keyed by tax id.
const SEED_CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer { name: "Ana Souza", tax_id: "12.345.678-9" },
    SeedCustomer { name: "Bruno Lima", tax_id: "23.456.789-0" },
    SeedCustomer { name: "Carla Mendes", tax_id: "34.567.890-1" },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedCustomer {
    pub name: &'static str,
    pub tax_id: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub customers_seeded: Vec<SeedCustomer>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// Deterministic demo dataset. Loading twice leaves the table unchanged.
pub struct DemoCustomerDataset;

impl DemoCustomerDataset {
    pub const SQL: &'static str = include_str!("../../../config/fixtures/demo_customers.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult { customers_seeded: SEED_CUSTOMERS.to_vec() })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(SEED_CUSTOMERS.len());

        for customer in SEED_CUSTOMERS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE tax_id = ?1 AND name = ?2)",
            )
            .bind(customer.tax_id)
            .bind(customer.name)
            .fetch_one(pool)
            .await?;
            checks.push((customer.tax_id, present == 1));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}
